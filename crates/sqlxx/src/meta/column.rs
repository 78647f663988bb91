use crate::error::{SqlxError, SqlxResult};
use crate::naming;

/// Column name that marks the primary key by convention.
pub const PRIMARY_KEY_COLUMN: &str = "id";
/// Column name that marks the tenant key by convention.
pub const TENANT_KEY_COLUMN: &str = "tenant_id";
/// Column name that marks the soft-delete flag by convention.
pub const SOFT_DELETE_COLUMN: &str = "is_deleted";

/// Explicit per-field markers.
///
/// `None` means "not specified": the naming convention decides. `Some(false)`
/// opts a field out of its convention.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markers {
    pub primary_key: Option<bool>,
    pub tenant_key: Option<bool>,
    pub soft_delete: Option<bool>,
    pub ignore: bool,
    pub column: Option<&'static str>,
}

impl Markers {
    /// Parse a comma-separated marker list: `primaryKey`, `_`, `tenantKey`,
    /// `softDelete`. Blank entries are skipped.
    pub fn parse(tag: &str) -> SqlxResult<Self> {
        let mut markers = Markers::default();
        for marker in tag.split(',').map(str::trim).filter(|m| !m.is_empty()) {
            match marker {
                "primaryKey" => markers.primary_key = Some(true),
                "_" => markers.ignore = true,
                "tenantKey" => markers.tenant_key = Some(true),
                "softDelete" => markers.soft_delete = Some(true),
                other => return Err(SqlxError::UnknownMarker(other.to_string())),
            }
        }
        Ok(markers)
    }
}

/// One mapped column of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub field_name: String,
    pub column_name: String,
    pub is_primary_key: bool,
    pub is_tenant_key: bool,
    pub is_soft_delete: bool,
    pub ignored: bool,
}

impl Column {
    /// A plain column named after the snake-cased field.
    pub fn new(field_name: impl Into<String>) -> Self {
        Self::from_field(field_name, Markers::default())
    }

    /// Build a column from a field name and its markers, falling back to the
    /// `id` / `tenant_id` / `is_deleted` conventions for unspecified flags.
    pub fn from_field(field_name: impl Into<String>, markers: Markers) -> Self {
        let field_name = field_name.into();
        let column_name = markers
            .column
            .map(str::to_string)
            .unwrap_or_else(|| naming::to_snake(&field_name));
        Self {
            is_primary_key: markers
                .primary_key
                .unwrap_or(column_name == PRIMARY_KEY_COLUMN),
            is_tenant_key: markers
                .tenant_key
                .unwrap_or(column_name == TENANT_KEY_COLUMN),
            is_soft_delete: markers
                .soft_delete
                .unwrap_or(column_name == SOFT_DELETE_COLUMN),
            ignored: markers.ignore,
            field_name,
            column_name,
        }
    }

    /// A column that appears in INSERT/UPDATE value lists.
    pub fn is_value_column(&self) -> bool {
        !self.ignored && !self.is_primary_key
    }
}
