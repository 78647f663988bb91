use super::Column;
use crate::error::{KeyKind, SqlxError, SqlxResult};
use crate::hooks::Hooks;
use crate::value::Value;
use std::fmt;

/// A type mapped to a table.
///
/// Usually derived with `#[derive(Record)]`; the derive emits the column
/// list at compile time and memoises [`Record::entity`] per type.
pub trait Record: Sized + 'static {
    /// Table name.
    fn table_name() -> &'static str;

    /// Append this type's columns in declaration order, splicing in the
    /// columns of flattened sub-records.
    fn collect_columns(columns: &mut Vec<Column>);

    /// The cached metadata for this type.
    fn entity() -> &'static Entity;

    /// Append one value per column, aligned with [`Record::collect_columns`].
    fn collect_values(&self, values: &mut Vec<Value>);

    fn values(&self) -> Vec<Value> {
        let mut values = Vec::new();
        self.collect_values(&mut values);
        values
    }

    /// The lifecycle hooks of this record, if it implements them.
    fn as_hooks(&mut self) -> Option<&mut dyn Hooks> {
        None
    }
}

/// Build the metadata of a record type. Prefer [`Record::entity`], which
/// caches the result.
pub fn build_entity<T: Record>() -> Entity {
    let mut columns = Vec::new();
    T::collect_columns(&mut columns);
    Entity::new(T::table_name(), columns)
}

/// Table name, ordered columns and the key columns.
///
/// Each key reference points at the first column carrying that flag. Later
/// duplicates are kept in [`Entity::validate`]'s report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    table_name: String,
    columns: Vec<Column>,
    primary_key: Option<usize>,
    tenant_key: Option<usize>,
    soft_delete_key: Option<usize>,
    duplicates: Vec<(KeyKind, usize, usize)>,
}

impl Entity {
    pub fn new(table_name: impl Into<String>, columns: Vec<Column>) -> Self {
        let mut entity = Self {
            table_name: table_name.into(),
            columns,
            primary_key: None,
            tenant_key: None,
            soft_delete_key: None,
            duplicates: Vec::new(),
        };
        entity.scan_keys();
        tracing::debug!(
            target: "sqlxx.meta",
            table = %entity.table_name,
            columns = entity.columns.len(),
            "entity built"
        );
        entity
    }

    fn scan_keys(&mut self) {
        for (idx, column) in self.columns.iter().enumerate() {
            if column.ignored {
                continue;
            }
            let flags = [
                (column.is_primary_key, KeyKind::PrimaryKey),
                (column.is_tenant_key, KeyKind::TenantKey),
                (column.is_soft_delete, KeyKind::SoftDelete),
            ];
            for (set, kind) in flags {
                if !set {
                    continue;
                }
                let slot = match kind {
                    KeyKind::PrimaryKey => &mut self.primary_key,
                    KeyKind::TenantKey => &mut self.tenant_key,
                    KeyKind::SoftDelete => &mut self.soft_delete_key,
                };
                match *slot {
                    None => *slot = Some(idx),
                    Some(first) => {
                        tracing::warn!(
                            target: "sqlxx.meta",
                            table = %self.table_name,
                            %kind,
                            first = %self.columns[first].column_name,
                            second = %column.column_name,
                            "duplicate key marker, keeping the first"
                        );
                        self.duplicates.push((kind, first, idx));
                    }
                }
            }
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn primary_key(&self) -> Option<&Column> {
        self.primary_key.map(|idx| &self.columns[idx])
    }

    pub fn tenant_key(&self) -> Option<&Column> {
        self.tenant_key.map(|idx| &self.columns[idx])
    }

    pub fn soft_delete_key(&self) -> Option<&Column> {
        self.soft_delete_key.map(|idx| &self.columns[idx])
    }

    pub(crate) fn primary_key_index(&self) -> Option<usize> {
        self.primary_key
    }

    pub(crate) fn tenant_key_index(&self) -> Option<usize> {
        self.tenant_key
    }

    /// The key column of the given kind, or a `MissingKey` error.
    pub fn require(&self, kind: KeyKind) -> SqlxResult<&Column> {
        let column = match kind {
            KeyKind::PrimaryKey => self.primary_key(),
            KeyKind::TenantKey => self.tenant_key(),
            KeyKind::SoftDelete => self.soft_delete_key(),
        };
        column.ok_or_else(|| SqlxError::missing_key(&self.table_name, kind))
    }

    /// Find a column by column name or field name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.column_name == name || c.field_name == name)
    }

    /// Position of a column, matched by column name or field name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.column_name == name || c.field_name == name)
    }

    /// Columns that are not ignored.
    pub fn mapped_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !c.ignored)
    }

    /// Columns written by INSERT and UPDATE: not ignored, not the primary key.
    pub fn value_columns(&self) -> impl Iterator<Item = (usize, &Column)> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_value_column())
    }

    /// Fail if any key marker was declared on more than one column.
    pub fn validate(&self) -> SqlxResult<()> {
        match self.duplicates.first() {
            None => Ok(()),
            Some(&(kind, first, second)) => Err(SqlxError::AmbiguousKey {
                table: self.table_name.clone(),
                kind,
                first: self.columns[first].column_name.clone(),
                second: self.columns[second].column_name.clone(),
            }),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.table_name)?;
        for (idx, column) in self.mapped_columns().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&column.column_name)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::Markers;

    #[test]
    fn conventional_keys() {
        let entity = Entity::new(
            "user",
            vec![Column::new("ID"), Column::new("TenantID"), Column::new("Name")],
        );
        assert_eq!(entity.columns().len(), 3);
        assert_eq!(entity.primary_key().unwrap().column_name, "id");
        assert_eq!(entity.tenant_key().unwrap().column_name, "tenant_id");
        assert!(entity.soft_delete_key().is_none());
        assert!(entity.validate().is_ok());
        assert_eq!(entity.to_string(), "user(id, tenant_id, name)");
    }

    #[test]
    fn duplicate_primary_keys_first_wins_but_fail_validation() {
        let entity = Entity::new(
            "user",
            vec![
                Column::new("id"),
                Column::from_field("uid", Markers::parse("primaryKey").unwrap()),
            ],
        );
        assert_eq!(entity.primary_key().unwrap().column_name, "id");
        let err = entity.validate().unwrap_err();
        assert!(err.is_ambiguous_key());
        assert!(err.to_string().contains("'id' and 'uid'"));
    }

    #[test]
    fn ignored_columns_never_become_keys() {
        let entity = Entity::new(
            "t",
            vec![Column::from_field("id", Markers::parse("_").unwrap())],
        );
        assert!(entity.primary_key().is_none());
        assert!(matches!(
            entity.require(KeyKind::PrimaryKey),
            Err(SqlxError::MissingKey { kind: KeyKind::PrimaryKey, .. })
        ));
    }

    #[test]
    fn lookup_by_field_or_column() {
        let entity = Entity::new("t", vec![Column::new("UserName")]);
        assert_eq!(entity.index_of("user_name"), Some(0));
        assert_eq!(entity.index_of("UserName"), Some(0));
        assert!(entity.column("missing").is_none());
    }
}
