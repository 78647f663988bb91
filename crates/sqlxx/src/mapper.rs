//! Statement assembly for a record type.
//!
//! A [`Mapper`] builds the usual CRUD statements from a record's metadata
//! without executing anything. Values are bound under their column names so
//! the statements render in either parameter style.
//!
//! ```ignore
//! let ctx = Context::new(&MYSQL).with_style(ParamStyle::Named);
//! let users = ctx.mapper::<User>();
//!
//! let stmt = users.delete_by_id(tenant_id, [1, 2, 3])?;
//! let rendered = users.render(stmt)?;
//! ```

use crate::context::Context;
use crate::error::{KeyKind, SqlxError, SqlxResult};
use crate::expr::{
    Expr, Insert, Select, SimpleQuery, and, delete_from, eq, in_list, insert_into, name, update,
    var,
};
use crate::hooks::{HookEvent, run_before};
use crate::meta::{Column, Entity, Record};
use crate::render::Rendered;
use crate::value::Value;
use serde::Serialize;
use std::marker::PhantomData;

/// Builds statements for records of type `T`.
#[derive(Debug)]
pub struct Mapper<'c, T: Record> {
    ctx: &'c Context,
    entity: &'static Entity,
    _marker: PhantomData<fn() -> T>,
}

impl<'c, T: Record> Mapper<'c, T> {
    pub fn new(ctx: &'c Context) -> Self {
        Self {
            ctx,
            entity: T::entity(),
            _marker: PhantomData,
        }
    }

    pub fn entity(&self) -> &'static Entity {
        self.entity
    }

    pub fn context(&self) -> &'c Context {
        self.ctx
    }

    /// Render through the context.
    pub fn render(&self, stmt: impl Into<Expr>) -> SqlxResult<Rendered> {
        self.ctx.render(&stmt.into())
    }

    fn table(&self) -> Expr {
        name(self.entity.table_name())
    }

    /// Every mapped column, in declaration order.
    pub fn select_columns(&self) -> Vec<Expr> {
        self.entity
            .mapped_columns()
            .map(|c| name(&c.column_name))
            .collect()
    }

    /// One INSERT per record, covering every non-key, non-ignored column.
    ///
    /// Runs `before_insert` hooks first.
    pub fn insert(&self, records: &mut [T]) -> SqlxResult<Vec<Insert>> {
        if records.is_empty() {
            return Err(SqlxError::invalid_query("no records to insert"));
        }
        run_before(HookEvent::Insert, records)?;
        Ok(records
            .iter()
            .map(|record| {
                let values = record.values();
                let pairs = self
                    .entity
                    .value_columns()
                    .map(|(idx, c)| assign(c, value_at(&values, idx)));
                insert_into(self.table(), pairs)
            })
            .collect())
    }

    /// UPDATE every non-key column, matched by primary key (and tenant key
    /// when `use_tenant` is set and the entity has one).
    ///
    /// Runs `before_update` hooks first.
    pub fn update_by_id(&self, record: &mut T, use_tenant: bool) -> SqlxResult<Expr> {
        let tenant = self.entity.tenant_key_index();
        let columns: Vec<usize> = self
            .entity
            .value_columns()
            .filter(|(idx, _)| Some(*idx) != tenant)
            .map(|(idx, _)| idx)
            .collect();
        self.update_columns(record, &columns, use_tenant)
    }

    /// UPDATE only `fields` (field or column names). With no fields, every
    /// non-key column whose value is not NULL is written.
    ///
    /// Runs `before_update` hooks first.
    pub fn partial_update(
        &self,
        record: &mut T,
        fields: &[&str],
        use_tenant: bool,
    ) -> SqlxResult<Expr> {
        let pk = self.entity.primary_key_index();
        let tenant = self.entity.tenant_key_index();
        let columns: Vec<usize> = if fields.is_empty() {
            let values = record.values();
            self.entity
                .value_columns()
                .filter(|(idx, _)| Some(*idx) != tenant && !value_at(&values, *idx).is_null())
                .map(|(idx, _)| idx)
                .collect()
        } else {
            fields
                .iter()
                .map(|field| {
                    self.entity
                        .index_of(field)
                        .filter(|idx| Some(*idx) != pk && !self.entity.columns()[*idx].ignored)
                        .ok_or_else(|| {
                            SqlxError::validation(format!(
                                "'{field}' is not an updatable column of '{}'",
                                self.entity.table_name()
                            ))
                        })
                })
                .collect::<SqlxResult<_>>()?
        };
        self.update_columns(record, &columns, use_tenant)
    }

    fn update_columns(
        &self,
        record: &mut T,
        columns: &[usize],
        use_tenant: bool,
    ) -> SqlxResult<Expr> {
        let pk = self.entity.require(KeyKind::PrimaryKey)?;
        run_before(HookEvent::Update, std::slice::from_mut(record))?;

        let values = record.values();
        let all = self.entity.columns();
        let set = columns
            .iter()
            .map(|&idx| assign(&all[idx], value_at(&values, idx)));

        let pk_value = self
            .entity
            .primary_key_index()
            .map(|idx| value_at(&values, idx))
            .unwrap_or(Value::Null);
        let mut conditions: Vec<Expr> = vec![assign(pk, pk_value).into()];
        if use_tenant
            && let Some(idx) = self.entity.tenant_key_index()
        {
            conditions.push(assign(&all[idx], value_at(&values, idx)).into());
        }

        Ok(update(self.table()).set(set).where_expr(and(conditions)).into())
    }

    /// Logical delete through the soft-delete column when the entity has
    /// one, physical DELETE otherwise.
    pub fn delete_by_id<V: Into<Value>>(
        &self,
        tenant: impl Into<Value>,
        ids: impl IntoIterator<Item = V>,
    ) -> SqlxResult<Expr> {
        let Some(flag) = self.entity.soft_delete_key() else {
            return self.erase_by_id(tenant, ids);
        };
        let condition = self.id_condition(tenant.into(), ids)?;
        Ok(update(self.table())
            .set([assign(flag, Value::Bool(true))])
            .where_expr(condition)
            .into())
    }

    /// Physical DELETE by primary key.
    pub fn erase_by_id<V: Into<Value>>(
        &self,
        tenant: impl Into<Value>,
        ids: impl IntoIterator<Item = V>,
    ) -> SqlxResult<Expr> {
        let condition = self.id_condition(tenant.into(), ids)?;
        Ok(delete_from(self.table()).where_expr(condition).into())
    }

    /// SELECT the mapped columns by primary key.
    pub fn select_by_id<V: Into<Value>>(
        &self,
        tenant: impl Into<Value>,
        ids: impl IntoIterator<Item = V>,
    ) -> SqlxResult<Select> {
        let condition = self.id_condition(tenant.into(), ids)?;
        Ok(crate::expr::select(self.select_columns())
            .from(self.table())
            .where_expr(condition))
    }

    pub fn select_by(&self, query: &SimpleQuery) -> Select {
        query.to_select(self.table(), self.select_columns())
    }

    pub fn count_by(&self, query: &SimpleQuery) -> Select {
        query.to_count(self.table())
    }

    /// [`Mapper::select_by`] with conditions taken from the set fields of
    /// `example` (see [`SimpleQuery::from_record`]).
    pub fn select_by_example(&self, example: &T) -> Select {
        self.select_by(&SimpleQuery::from_record(example))
    }

    pub fn count_by_example(&self, example: &T) -> Select {
        self.count_by(&SimpleQuery::from_record(example))
    }

    /// [`Mapper::select_by`] with conditions taken from the non-null fields
    /// of a separate filter type, matched to this entity's columns.
    pub fn select_by_filter<E: Serialize + ?Sized>(&self, filter: &E) -> SqlxResult<Select> {
        Ok(self.select_by(&SimpleQuery::from_filter(self.entity, filter)?))
    }

    pub fn count_by_filter<E: Serialize + ?Sized>(&self, filter: &E) -> SqlxResult<Select> {
        Ok(self.count_by(&SimpleQuery::from_filter(self.entity, filter)?))
    }

    /// `pk IN (...) [AND tenant = :tenant]`
    fn id_condition<V: Into<Value>>(
        &self,
        tenant: Value,
        ids: impl IntoIterator<Item = V>,
    ) -> SqlxResult<Expr> {
        let pk = self.entity.require(KeyKind::PrimaryKey)?;
        let ids: Vec<Value> = ids.into_iter().map(Into::into).collect();
        if ids.is_empty() {
            return Err(SqlxError::invalid_query(format!(
                "no ids given for '{}'",
                self.entity.table_name()
            )));
        }
        let by_id = in_list(name(&pk.column_name), &pk.column_name, ids);
        match self.entity.tenant_key() {
            Some(tk) if !tenant.is_null() => Ok(and([by_id.into(), assign(tk, tenant).into()])),
            _ => Ok(by_id.into()),
        }
    }
}

/// `` `column`=:column ``
fn assign(column: &Column, value: Value) -> crate::expr::BinaryExpr {
    eq(
        name(&column.column_name),
        var(&column.column_name, value),
    )
}

fn value_at(values: &[Value], idx: usize) -> Value {
    values.get(idx).cloned().unwrap_or(Value::Null)
}
