use super::{Direction, Expr, Select, and, eq, name, select, sorts, var};
use crate::error::{SqlxError, SqlxResult};
use crate::expr::filter::fuzzy;
use crate::meta::{Entity, Record};
use crate::naming;
use crate::value::Value;
use serde::Serialize;
use std::collections::BTreeMap;

/// Equality conditions, sort columns and pagination for a single table.
///
/// Converted to a [`Select`] with each condition bound under its column name.
/// String conditions that look like patterns become `LIKE`.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use]
pub struct SimpleQuery {
    pub condition: BTreeMap<String, Value>,
    pub sort_columns: Vec<String>,
    pub desc: bool,
    pub limit: u64,
    pub offset: u64,
}

impl SimpleQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the condition map from the non-null fields of a serializable
    /// value (record or map). Keys are snake-cased, with no entity to
    /// consult; prefer [`SimpleQuery::from_record`] or
    /// [`SimpleQuery::from_filter`] when the target entity is known.
    pub fn from_example<E: Serialize + ?Sized>(example: &E) -> SqlxResult<Self> {
        Ok(Self::new().with_map(example_map(example)?))
    }

    /// Conditions from the set fields of a record, keyed by column name.
    ///
    /// Ignored columns, NULLs and zero values (`0`, `false`, `""`) are
    /// skipped; flattened fields contribute their own columns.
    pub fn from_record<T: Record>(record: &T) -> Self {
        let condition = T::entity()
            .columns()
            .iter()
            .zip(record.values())
            .filter(|(column, value)| !column.ignored && !value.is_null() && !value.is_zero())
            .map(|(column, value)| (column.column_name.clone(), value))
            .collect();
        Self {
            condition,
            ..Self::default()
        }
    }

    /// Conditions from the non-null fields of a filter type, resolved
    /// against `entity`.
    ///
    /// Each key is looked up as a field or column name (then snake-cased)
    /// and stored under the column name. Ignored columns are skipped; a key
    /// that names no column is a validation error.
    pub fn from_filter<E: Serialize + ?Sized>(entity: &Entity, filter: &E) -> SqlxResult<Self> {
        let mut condition = BTreeMap::new();
        for (key, value) in object_fields(filter)? {
            let column = entity
                .column(&key)
                .or_else(|| entity.column(&naming::to_snake(&key)))
                .ok_or_else(|| {
                    SqlxError::validation(format!(
                        "'{key}' is not a column of '{}'",
                        entity.table_name()
                    ))
                })?;
            if !column.ignored {
                condition.insert(column.column_name.clone(), value);
            }
        }
        Ok(Self {
            condition,
            ..Self::default()
        })
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.condition.insert(column.into(), value.into());
        self
    }

    pub fn with_map<K, V>(mut self, map: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.condition
            .extend(map.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn order_by<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.sort_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sort ascending; an empty `columns` keeps the current sort columns.
    pub fn asc<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.replace_sort(columns);
        self.desc = false;
        self
    }

    /// Sort descending; an empty `columns` keeps the current sort columns.
    pub fn desc<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.replace_sort(columns);
        self.desc = true;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    fn replace_sort<S: Into<String>>(&mut self, columns: impl IntoIterator<Item = S>) {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if !columns.is_empty() {
            self.sort_columns = columns;
        }
    }

    pub fn direction(&self) -> Direction {
        if self.desc {
            Direction::Desc
        } else {
            Direction::Asc
        }
    }

    /// The WHERE clause, or `None` when there are no conditions.
    pub fn where_expr(&self) -> Option<Expr> {
        if self.condition.is_empty() {
            return None;
        }
        let mut expr = and(self.condition.iter().map(|(column, value)| {
            let right = if value.is_null() {
                Expr::Constant(Value::Null)
            } else {
                var(column.clone(), value.clone())
            };
            eq(name(column.clone()), right).into()
        }));
        fuzzy(&mut expr);
        Some(expr)
    }

    /// `SELECT columns FROM table WHERE ... ORDER BY ... LIMIT ... OFFSET ...`
    pub fn to_select(&self, table: impl Into<Expr>, columns: Vec<Expr>) -> Select {
        let mut stmt = select(columns).from(table);
        stmt.where_expr = self.where_expr();
        if !self.sort_columns.is_empty() {
            stmt = stmt.order_by([sorts(
                self.direction(),
                self.sort_columns.iter().map(|c| name(c.clone())),
            )]);
        }
        if self.limit > 0 {
            stmt = stmt.limit(self.limit);
        }
        if self.offset > 0 {
            stmt = stmt.offset(self.offset);
        }
        stmt
    }

    /// `SELECT COUNT(1) FROM table WHERE ...`
    pub fn to_count(&self, table: impl Into<Expr>) -> Select {
        self.to_select(table, Vec::new()).build_count()
    }
}

/// Serialize a record or map into column → value pairs, dropping nulls.
pub(crate) fn example_map<E: Serialize + ?Sized>(
    example: &E,
) -> SqlxResult<BTreeMap<String, Value>> {
    Ok(object_fields(example)?
        .map(|(k, v)| (naming::to_snake(&k), v))
        .collect())
}

/// The non-null top-level fields of a serialized record or map, keys as-is.
fn object_fields<E: Serialize + ?Sized>(
    example: &E,
) -> SqlxResult<impl Iterator<Item = (String, Value)>> {
    let fields = match serde_json::to_value(example)? {
        serde_json::Value::Object(fields) => fields,
        serde_json::Value::Null => serde_json::Map::new(),
        other => {
            return Err(SqlxError::Serialization(format!(
                "expected a record or map, got {other}"
            )));
        }
    };
    Ok(fields
        .into_iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k, Value::from(v))))
}
