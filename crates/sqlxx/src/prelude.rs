//! Convenient imports for typical `sqlxx` usage.
//!
//! ```ignore
//! use sqlxx::prelude::*;
//! ```

pub use crate::{
    Context, ContextConfig, Dialect, Entity, Expr, Filters, HookEvent, Hooks, Mapper, MYSQL,
    ParamStyle, Record, Rendered, SQL_SERVER, SimpleQuery, SqlxError, SqlxResult, Value,
};

pub use crate::expr::{
    Direction, all, and, asc, between, constant, count, delete_from, desc, in_list, insert_into,
    name, not, null, or, paren, raw, select, update, value, var,
};
