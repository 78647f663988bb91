//! Expression tree for building SQL statements.
//!
//! [`Expr`] is a closed set of node kinds. Nodes compose into a tree that
//! represents one statement, and the tree is turned into SQL text plus
//! arguments by [`crate::render`]:
//!
//! ```ignore
//! use sqlxx::expr::*;
//!
//! let stmt = select([all()])
//!     .from(name("user"))
//!     .where_expr(and([name("id").eq(var("id", 1)), name("name").like("gn%")]));
//! ```
//!
//! Builders are plain functions returning owned nodes. Nothing here touches
//! a dialect; quoting and placeholders are decided at render time.

mod delete;
pub(crate) mod filter;
mod insert;
mod select;
pub(crate) mod simple;
mod update;

#[cfg(test)]
mod tests;

pub use delete::{Delete, delete_from};
pub use filter::{
    Filter, Filters, all_to_and, all_to_or, auto_fuzzy, delete_fn, select_fn, set, update_fn,
    use_condition, use_limit, use_limits, use_offset, use_order_by, use_sort, with_count,
};
pub use insert::{Insert, insert_into};
pub use select::{Select, select};
pub use simple::SimpleQuery;
pub use update::{Update, update};

use crate::value::Value;
use chrono::NaiveDateTime;

/// A node of the statement tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Quoted identifier, optionally qualified: `` `user`.`id` ``.
    Identifier { qualifiers: Vec<String>, name: String },
    /// Inline literal, quoted and escaped.
    Constant(Value),
    /// Placeholder bound to a value; `name` is required for named rendering.
    Bound { name: Option<String>, value: Value },
    /// Verbatim fragment, type-directed formatting without escaping.
    Raw(Value),
    Binary(BinaryExpr),
    Unary { op: UnaryOp, operand: Box<Expr> },
    List(ListExpr),
    Function { name: String, args: Vec<Expr> },
    Between { operand: Box<Expr>, start: Box<Expr>, end: Box<Expr> },
    Alias { expr: Box<Expr>, alias: String },
    /// `( expr )`
    Paren(Box<Expr>),
    Select(Box<Select>),
    Insert(Box<Insert>),
    Update(Box<Update>),
    Delete(Box<Delete>),
}

/// Binary operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
    NotLike,
    In,
    NotIn,
    Is,
    IsNot,
    Custom(String),
}

impl BinaryOp {
    pub fn as_str(&self) -> &str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "!=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Like => "LIKE",
            BinaryOp::NotLike => "NOT LIKE",
            BinaryOp::In => "IN",
            BinaryOp::NotIn => "NOT IN",
            BinaryOp::Is => "IS",
            BinaryOp::IsNot => "IS NOT",
            BinaryOp::Custom(op) => op,
        }
    }

    /// Keyword operators are surrounded by spaces; symbols are not.
    pub fn is_keyword(&self) -> bool {
        self.as_str()
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
    }
}

/// `left op right`
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub op: BinaryOp,
    pub right: Box<Expr>,
}

impl BinaryExpr {
    pub fn new(left: impl Into<Expr>, op: BinaryOp, right: impl Into<Expr>) -> Self {
        Self {
            left: Box::new(left.into()),
            op,
            right: Box::new(right.into()),
        }
    }
}

/// Prefix operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Exists,
    Custom(String),
}

impl UnaryOp {
    pub fn as_str(&self) -> &str {
        match self {
            UnaryOp::Not => "NOT",
            UnaryOp::Exists => "EXISTS",
            UnaryOp::Custom(op) => op,
        }
    }
}

/// Separator between list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSep {
    /// ` AND `
    And,
    /// ` OR `
    Or,
    /// `,`
    Comma,
    /// ` `
    Space,
}

impl ListSep {
    pub fn is_logical(self) -> bool {
        matches!(self, ListSep::And | ListSep::Or)
    }
}

/// Items joined by a separator, with optional prefix and suffix nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ListExpr {
    pub sep: ListSep,
    pub items: Vec<Expr>,
    pub prefix: Option<Box<Expr>>,
    pub suffix: Option<Box<Expr>>,
}

impl ListExpr {
    pub fn is_empty_condition(&self) -> bool {
        self.sep.is_logical()
            && self.prefix.is_none()
            && self.suffix.is_none()
            && self.items.iter().all(Expr::is_empty_condition)
    }

    /// Items that are written out; empty conditions drop out of logical lists.
    pub fn rendered_items(&self) -> impl Iterator<Item = &Expr> {
        let logical = self.sep.is_logical();
        self.items
            .iter()
            .filter(move |item| !(logical && item.is_empty_condition()))
    }

    pub fn new(sep: ListSep, items: impl IntoIterator<Item = Expr>) -> Self {
        Self {
            sep,
            items: items.into_iter().collect(),
            prefix: None,
            suffix: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<Expr>) -> Self {
        self.prefix = Some(Box::new(prefix.into()));
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<Expr>) -> Self {
        self.suffix = Some(Box::new(suffix.into()));
        self
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

// ==================== Leaf constructors ====================

/// An identifier: column, table or alias name.
pub fn name(name: impl Into<String>) -> Expr {
    Expr::Identifier {
        qualifiers: Vec::new(),
        name: name.into(),
    }
}

/// A qualified identifier; `qualified(["user"], "id")` renders `` `user`.`id` ``.
pub fn qualified<Q, S>(qualifiers: Q, name: impl Into<String>) -> Expr
where
    Q: IntoIterator<Item = S>,
    S: Into<String>,
{
    Expr::Identifier {
        qualifiers: qualifiers.into_iter().map(Into::into).collect(),
        name: name.into(),
    }
}

/// An inline literal.
pub fn constant(value: impl Into<Value>) -> Expr {
    Expr::Constant(value.into())
}

/// A named bound value.
pub fn var(name: impl Into<String>, value: impl Into<Value>) -> Expr {
    Expr::Bound {
        name: Some(name.into()),
        value: value.into(),
    }
}

/// An unnamed bound value, only renderable with positional parameters.
pub fn value(value: impl Into<Value>) -> Expr {
    Expr::Bound {
        name: None,
        value: value.into(),
    }
}

/// A verbatim fragment.
pub fn raw(value: impl Into<Value>) -> Expr {
    Expr::Raw(value.into())
}

/// `*`
pub fn all() -> Expr {
    Expr::Raw(Value::from("*"))
}

/// `NULL`
pub fn null() -> Expr {
    Expr::Constant(Value::Null)
}

// ==================== Comparisons ====================

/// `left op right`. A NULL right side turns the operator into `IS` / `IS NOT`.
pub fn binary(left: impl Into<Expr>, op: BinaryOp, right: impl Into<Expr>) -> BinaryExpr {
    let right = right.into();
    let op = match (&right, op) {
        (Expr::Constant(Value::Null), BinaryOp::Ne) => BinaryOp::IsNot,
        (Expr::Constant(Value::Null), BinaryOp::Eq | BinaryOp::Like) => BinaryOp::Is,
        (_, op) => op,
    };
    BinaryExpr::new(left, op, right)
}

pub fn eq(left: impl Into<Expr>, right: impl Into<Expr>) -> BinaryExpr {
    binary(left, BinaryOp::Eq, right)
}

pub fn ne(left: impl Into<Expr>, right: impl Into<Expr>) -> BinaryExpr {
    binary(left, BinaryOp::Ne, right)
}

pub fn gt(left: impl Into<Expr>, right: impl Into<Expr>) -> BinaryExpr {
    binary(left, BinaryOp::Gt, right)
}

pub fn ge(left: impl Into<Expr>, right: impl Into<Expr>) -> BinaryExpr {
    binary(left, BinaryOp::Ge, right)
}

pub fn lt(left: impl Into<Expr>, right: impl Into<Expr>) -> BinaryExpr {
    binary(left, BinaryOp::Lt, right)
}

pub fn le(left: impl Into<Expr>, right: impl Into<Expr>) -> BinaryExpr {
    binary(left, BinaryOp::Le, right)
}

pub fn like(left: impl Into<Expr>, right: impl Into<Expr>) -> BinaryExpr {
    binary(left, BinaryOp::Like, right)
}

pub fn not_like(left: impl Into<Expr>, right: impl Into<Expr>) -> BinaryExpr {
    binary(left, BinaryOp::NotLike, right)
}

/// `left BETWEEN start AND end`
pub fn between(left: impl Into<Expr>, start: impl Into<Expr>, end: impl Into<Expr>) -> Expr {
    Expr::Between {
        operand: Box::new(left.into()),
        start: Box::new(start.into()),
        end: Box::new(end.into()),
    }
}

/// `left IN ( v1,v2 )` over already-built nodes.
pub fn in_values(left: impl Into<Expr>, values: impl IntoIterator<Item = Expr>) -> BinaryExpr {
    BinaryExpr::new(left, BinaryOp::In, paren(list(ListSep::Comma, values)))
}

/// `left NOT IN ( v1,v2 )` over already-built nodes.
pub fn not_in_values(left: impl Into<Expr>, values: impl IntoIterator<Item = Expr>) -> BinaryExpr {
    BinaryExpr::new(left, BinaryOp::NotIn, paren(list(ListSep::Comma, values)))
}

/// `left IN (...)` binding each value as `<name>_<index>`.
///
/// With an empty `name` the values stay unnamed and must be rendered
/// positionally. NULL values are inlined. An empty value list renders as
/// the always-false predicate `1=0` (`1=1` for [`not_in`]).
pub fn in_list<V: Into<Value>>(
    left: impl Into<Expr>,
    name: &str,
    values: impl IntoIterator<Item = V>,
) -> BinaryExpr {
    in_values(left, auto_named(name, values))
}

/// `left NOT IN (...)`, naming values like [`in_list`].
pub fn not_in<V: Into<Value>>(
    left: impl Into<Expr>,
    name: &str,
    values: impl IntoIterator<Item = V>,
) -> BinaryExpr {
    not_in_values(left, auto_named(name, values))
}

/// Bind each value under `<name>_<index>`.
pub fn auto_named<V: Into<Value>>(name: &str, values: impl IntoIterator<Item = V>) -> Vec<Expr> {
    values
        .into_iter()
        .enumerate()
        .map(|(idx, v)| match Into::<Value>::into(v) {
            Value::Null => null(),
            v if name.is_empty() => value(v),
            v => var(format!("{name}_{idx}"), v),
        })
        .collect()
}

// ==================== Logical / structural ====================

pub fn and(items: impl IntoIterator<Item = Expr>) -> Expr {
    list(ListSep::And, items)
}

pub fn or(items: impl IntoIterator<Item = Expr>) -> Expr {
    list(ListSep::Or, items)
}

pub fn list(sep: ListSep, items: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::List(ListExpr::new(sep, items))
}

pub fn not(expr: impl Into<Expr>) -> Expr {
    Expr::Unary {
        op: UnaryOp::Not,
        operand: Box::new(expr.into()),
    }
}

pub fn exists(expr: impl Into<Expr>) -> Expr {
    Expr::Unary {
        op: UnaryOp::Exists,
        operand: Box::new(expr.into()),
    }
}

pub fn paren(expr: impl Into<Expr>) -> Expr {
    Expr::Paren(Box::new(expr.into()))
}

/// `NAME(arg,arg)`
pub fn func(name: impl Into<String>, args: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args: args.into_iter().collect(),
    }
}

/// `COUNT(1)`
pub fn count() -> Expr {
    func("COUNT", [raw(1)])
}

/// `COUNT(*)`
pub fn count_all() -> Expr {
    func("COUNT", [all()])
}

/// `expr AS alias`
pub fn alias(expr: impl Into<Expr>, alias: impl Into<String>) -> Expr {
    Expr::Alias {
        expr: Box::new(expr.into()),
        alias: alias.into(),
    }
}

// ==================== Sorting ====================

pub fn sort(expr: impl Into<Expr>, direction: Direction) -> Expr {
    Expr::List(ListExpr::new(ListSep::Space, [expr.into()]).with_suffix(raw(direction.as_str())))
}

pub fn asc(expr: impl Into<Expr>) -> Expr {
    sort(expr, Direction::Asc)
}

pub fn desc(expr: impl Into<Expr>) -> Expr {
    sort(expr, Direction::Desc)
}

/// Several columns sorted in the same direction, comma separated.
pub fn sorts(direction: Direction, exprs: impl IntoIterator<Item = Expr>) -> Expr {
    list(ListSep::Comma, exprs.into_iter().map(|e| sort(e, direction)))
}

// ==================== Identifier shortcuts ====================

impl Expr {
    pub fn eq(self, right: impl Into<Expr>) -> BinaryExpr {
        eq(self, right)
    }

    pub fn ne(self, right: impl Into<Expr>) -> BinaryExpr {
        ne(self, right)
    }

    pub fn gt(self, right: impl Into<Expr>) -> BinaryExpr {
        gt(self, right)
    }

    pub fn ge(self, right: impl Into<Expr>) -> BinaryExpr {
        ge(self, right)
    }

    pub fn lt(self, right: impl Into<Expr>) -> BinaryExpr {
        lt(self, right)
    }

    pub fn le(self, right: impl Into<Expr>) -> BinaryExpr {
        le(self, right)
    }

    pub fn like(self, right: impl Into<Expr>) -> BinaryExpr {
        like(self, right)
    }

    pub fn alias(self, alias: impl Into<String>) -> Expr {
        crate::expr::alias(self, alias)
    }

    /// The WHERE clause of a statement node, if it has one.
    pub fn where_clause(&self) -> Option<&Expr> {
        match self {
            Expr::Select(s) => s.where_expr.as_ref(),
            Expr::Update(u) => u.where_expr.as_ref(),
            Expr::Delete(d) => d.where_expr.as_ref(),
            _ => None,
        }
    }

    /// Mutable access to the WHERE slot of a statement node.
    pub fn where_slot(&mut self) -> Option<&mut Option<Expr>> {
        match self {
            Expr::Select(s) => Some(&mut s.where_expr),
            Expr::Update(u) => Some(&mut u.where_expr),
            Expr::Delete(d) => Some(&mut d.where_expr),
            _ => None,
        }
    }

    /// A logical list with nothing to test, such as `and(Vec::new())`.
    ///
    /// Lists made only of empty conditions count as empty too.
    pub fn is_empty_condition(&self) -> bool {
        match self {
            Expr::List(list) => list.is_empty_condition(),
            Expr::Paren(inner) => inner.is_empty_condition(),
            _ => false,
        }
    }

    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            Expr::Select(_) | Expr::Insert(_) | Expr::Update(_) | Expr::Delete(_)
        )
    }
}

// ==================== Conversions ====================

impl From<BinaryExpr> for Expr {
    fn from(b: BinaryExpr) -> Self {
        Expr::Binary(b)
    }
}

impl From<ListExpr> for Expr {
    fn from(l: ListExpr) -> Self {
        Expr::List(l)
    }
}

impl From<Value> for Expr {
    fn from(v: Value) -> Self {
        Expr::Constant(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Expr {
    fn from(v: Option<T>) -> Self {
        Expr::Constant(Value::from(v))
    }
}

macro_rules! expr_from_constant {
    ($($t:ty),* $(,)?) => {
        $(impl From<$t> for Expr {
            fn from(v: $t) -> Self {
                Expr::Constant(Value::from(v))
            }
        })*
    };
}

expr_from_constant!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, &str, String,
    NaiveDateTime, uuid::Uuid,
);
