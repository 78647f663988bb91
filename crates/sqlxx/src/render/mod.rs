//! Turning statement trees into SQL text plus arguments.
//!
//! [`render`] walks an [`Expr`] with a fresh [`Buffer`], so a tree can be
//! rendered any number of times, in either parameter style, without being
//! modified:
//!
//! ```ignore
//! use sqlxx::{dialect::MYSQL, expr::*, render::{render, ParamStyle}};
//!
//! let stmt: Expr = update(name("table"))
//!     .set([name("name").eq(var("name", "gnodux"))])
//!     .where_expr(name("id").eq(var("id", 1)))
//!     .into();
//!
//! let named = render(&stmt, &MYSQL, ParamStyle::Named)?;
//! assert_eq!(named.sql, "UPDATE `table` SET `name`=:name WHERE `id`=:id");
//!
//! let positional = render(&stmt, &MYSQL, ParamStyle::Positional)?;
//! assert_eq!(positional.sql, "UPDATE `table` SET `name`=? WHERE `id`=?");
//! ```

mod buffer;

pub use buffer::Buffer;

use crate::dialect::Dialect;
use crate::error::SqlxResult;
use crate::expr::Expr;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How bound values are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamStyle {
    /// `:name` placeholders collected into a name → value map.
    Named,
    /// `?` placeholders collected into an ordered list.
    #[default]
    Positional,
}

impl fmt::Display for ParamStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamStyle::Named => f.write_str("named"),
            ParamStyle::Positional => f.write_str("positional"),
        }
    }
}

/// Arguments collected while rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Args {
    Positional(Vec<Value>),
    Named(BTreeMap<String, Value>),
}

impl Args {
    pub fn new(style: ParamStyle) -> Self {
        match style {
            ParamStyle::Named => Args::Named(BTreeMap::new()),
            ParamStyle::Positional => Args::Positional(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Args::Positional(v) => v.len(),
            Args::Named(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_positional(&self) -> Option<&[Value]> {
        match self {
            Args::Positional(v) => Some(v),
            Args::Named(_) => None,
        }
    }

    pub fn as_named(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Args::Named(m) => Some(m),
            Args::Positional(_) => None,
        }
    }

    /// Look up a named argument.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.as_named().and_then(|m| m.get(name))
    }
}

/// SQL text with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub sql: String,
    pub args: Args,
}

impl Rendered {
    pub fn style(&self) -> ParamStyle {
        match self.args {
            Args::Named(_) => ParamStyle::Named,
            Args::Positional(_) => ParamStyle::Positional,
        }
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Render a tree for `dialect` in the given parameter style.
pub fn render(expr: &Expr, dialect: &Dialect, style: ParamStyle) -> SqlxResult<Rendered> {
    let mut buffer = Buffer::new(dialect, style)?;
    buffer.write_expr(expr)?;
    Ok(buffer.finish())
}

/// Render a tree with positional placeholders.
pub fn render_positional(expr: &Expr, dialect: &Dialect) -> SqlxResult<Rendered> {
    render(expr, dialect, ParamStyle::Positional)
}

/// Render a tree with named placeholders.
pub fn render_named(expr: &Expr, dialect: &Dialect) -> SqlxResult<Rendered> {
    render(expr, dialect, ParamStyle::Named)
}
