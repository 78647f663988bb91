//! Statement-level transforms applied before rendering.
//!
//! A [`Filter`] mutates a statement tree in place. [`Filters::apply`] runs a
//! sequence of them over a fresh clone, so the caller's tree is untouched.
//!
//! Filters that target one statement kind (e.g. [`use_limit`] on SELECT) do
//! nothing when applied to another kind. Filters that expect a list-shaped
//! WHERE clause ([`all_to_and`], [`all_to_or`]) likewise leave any other shape
//! alone.

use super::{BinaryExpr, BinaryOp, Delete, Direction, Expr, ListSep, Select, Update, sorts};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// A statement transform.
#[derive(Clone)]
pub struct Filter(Arc<dyn Fn(&mut Expr) + Send + Sync>);

impl Filter {
    pub fn new(f: impl Fn(&mut Expr) + Send + Sync + 'static) -> Self {
        Filter(Arc::new(f))
    }

    pub fn apply(&self, expr: &mut Expr) {
        (self.0)(expr)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Filter").field(&"<fn>").finish()
    }
}

/// An ordered collection of filters.
#[derive(Clone, Debug, Default)]
pub struct Filters {
    filters: Vec<Filter>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: Filter) -> &mut Self {
        self.filters.push(filter);
        self
    }

    /// Chaining form of [`Filters::push`].
    pub fn select(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply every filter, in order, to a clone of `expr`.
    pub fn apply(&self, expr: &Expr) -> Expr {
        let mut out = expr.clone();
        self.apply_in_place(&mut out);
        out
    }

    pub fn apply_in_place(&self, expr: &mut Expr) {
        for filter in &self.filters {
            filter.apply(expr);
        }
    }
}

impl FromIterator<Filter> for Filters {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        Self {
            filters: iter.into_iter().collect(),
        }
    }
}

// ==================== Adapters ====================

/// Run `f` only on SELECT statements.
pub fn select_fn(f: impl Fn(&mut Select) + Send + Sync + 'static) -> Filter {
    Filter::new(move |expr| {
        if let Expr::Select(s) = expr {
            f(s)
        }
    })
}

/// Run `f` only on UPDATE statements.
pub fn update_fn(f: impl Fn(&mut Update) + Send + Sync + 'static) -> Filter {
    Filter::new(move |expr| {
        if let Expr::Update(u) = expr {
            f(u)
        }
    })
}

/// Run `f` only on DELETE statements.
pub fn delete_fn(f: impl Fn(&mut Delete) + Send + Sync + 'static) -> Filter {
    Filter::new(move |expr| {
        if let Expr::Delete(d) = expr {
            f(d)
        }
    })
}

// ==================== Filters ====================

/// Replace the WHERE clause of a SELECT, UPDATE or DELETE.
pub fn use_condition(condition: impl Into<Expr>) -> Filter {
    let condition = condition.into();
    Filter::new(move |expr| {
        if let Some(slot) = expr.where_slot() {
            *slot = Some(condition.clone());
        }
    })
}

pub fn use_limit(limit: u64) -> Filter {
    select_fn(move |s| s.limit = Some(limit))
}

pub fn use_offset(offset: u64) -> Filter {
    select_fn(move |s| s.offset = Some(offset))
}

pub fn use_limits(limit: u64, offset: u64) -> Filter {
    select_fn(move |s| {
        s.limit = Some(limit);
        s.offset = Some(offset);
    })
}

/// Request a companion count query.
pub fn with_count() -> Filter {
    select_fn(|s| s.with_count = true)
}

/// Replace the ORDER BY items.
pub fn use_order_by(items: impl IntoIterator<Item = Expr>) -> Filter {
    let items: Vec<Expr> = items.into_iter().collect();
    select_fn(move |s| s.order_by = items.clone())
}

/// ORDER BY several columns in one direction.
pub fn use_sort(direction: Direction, columns: impl IntoIterator<Item = Expr>) -> Filter {
    let order = sorts(direction, columns);
    select_fn(move |s| s.order_by = vec![order.clone()])
}

/// Replace the SET assignments of an UPDATE.
pub fn set(pairs: impl IntoIterator<Item = BinaryExpr>) -> Filter {
    let set: Vec<Expr> = pairs.into_iter().map(Expr::Binary).collect();
    update_fn(move |u| u.set = set.clone())
}

/// Turn `col = 'pattern'` into `col LIKE 'pattern'` when the string holds
/// any of `% ? .`.
pub fn auto_fuzzy() -> Filter {
    Filter::new(|expr| {
        if let Some(Some(where_expr)) = expr.where_slot() {
            fuzzy(where_expr);
        }
    })
}

/// Join the items of a list-shaped WHERE clause with AND.
pub fn all_to_and() -> Filter {
    Filter::new(|expr| set_where_separator(expr, ListSep::And))
}

/// Join the items of a list-shaped WHERE clause with OR.
pub fn all_to_or() -> Filter {
    Filter::new(|expr| set_where_separator(expr, ListSep::Or))
}

fn set_where_separator(expr: &mut Expr, sep: ListSep) {
    if let Some(Some(Expr::List(list))) = expr.where_slot() {
        list.sep = sep;
    }
}

pub(crate) fn fuzzy(expr: &mut Expr) {
    match expr {
        Expr::List(list) => list.items.iter_mut().for_each(fuzzy),
        Expr::Paren(inner) => fuzzy(inner),
        Expr::Binary(b) if b.op == BinaryOp::Eq => {
            if let Expr::Bound { value, .. } | Expr::Constant(value) = b.right.as_ref()
                && is_fuzzy(value)
            {
                b.op = BinaryOp::Like;
            }
        }
        _ => {}
    }
}

pub(crate) fn is_fuzzy(value: &Value) -> bool {
    value
        .as_text()
        .is_some_and(|s| s.contains(['%', '?', '.']))
}
