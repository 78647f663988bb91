//! Error types for sqlxx

use thiserror::Error;

/// Result type alias for sqlxx operations
pub type SqlxResult<T> = Result<T, SqlxError>;

/// Which of the entity's special columns an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    PrimaryKey,
    TenantKey,
    SoftDelete,
}

impl std::fmt::Display for KeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyKind::PrimaryKey => f.write_str("primary key"),
            KeyKind::TenantKey => f.write_str("tenant key"),
            KeyKind::SoftDelete => f.write_str("soft-delete key"),
        }
    }
}

/// Error types for statement construction, rendering and metadata.
#[derive(Debug, Error)]
pub enum SqlxError {
    /// The statement tree cannot be rendered (e.g. SELECT without FROM).
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A bound value without a name was rendered in named mode.
    #[error("Unnamed bound value cannot be rendered with named parameters")]
    UnnamedParameter,

    /// The same parameter name was bound to two different values.
    #[error("Parameter '{name}' is bound to conflicting values")]
    ConflictingParameter { name: String },

    /// Named rendering was requested for a dialect without named parameters.
    #[error("Dialect '{dialect}' does not support named parameters")]
    UnsupportedStyle { dialect: &'static str },

    /// Unknown entry in a comma-separated marker tag.
    #[error("Unknown column marker '{0}'")]
    UnknownMarker(String),

    /// More than one column carries the same key marker.
    #[error("Table '{table}' declares more than one {kind}: '{first}' and '{second}'")]
    AmbiguousKey {
        table: String,
        kind: KeyKind,
        first: String,
        second: String,
    },

    /// An operation needs a key column the entity does not have.
    #[error("Table '{table}' has no {kind}")]
    MissingKey { table: String, kind: KeyKind },

    /// No dialect is registered under this driver name.
    #[error("Unknown dialect: {0}")]
    UnknownDialect(String),

    /// Converting an example record into column values failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A lifecycle hook rejected the record.
    #[error("Hook error: {0}")]
    Hook(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl SqlxError {
    /// Create an invalid query error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a hook error
    pub fn hook(message: impl Into<String>) -> Self {
        Self::Hook(message.into())
    }

    /// Create a missing key error
    pub fn missing_key(table: impl Into<String>, kind: KeyKind) -> Self {
        Self::MissingKey {
            table: table.into(),
            kind,
        }
    }

    /// Check if this is an invalid query error
    pub fn is_invalid_query(&self) -> bool {
        matches!(self, Self::InvalidQuery(_))
    }

    /// Check if this is an ambiguous key error
    pub fn is_ambiguous_key(&self) -> bool {
        matches!(self, Self::AmbiguousKey { .. })
    }
}

impl From<serde_json::Error> for SqlxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
