//! # sqlxx
//!
//! A dialect-aware SQL statement builder with entity mapping, for MySQL and
//! SQL Server.
//!
//! ## Features
//!
//! - **Expression trees**: statements are plain values built from [`expr`]
//!   functions and rendered later
//! - **Two parameter styles**: positional (`?`) or named (`:id` / `@id`)
//! - **Dialects**: identifier quoting, keyword translation and pagination
//!   per database
//! - **Entity metadata**: `#[derive(Record)]` maps a struct to a table with
//!   primary, tenant and soft-delete keys
//! - **Filters**: statement transforms (pagination, sorting, fuzzy matching)
//!   applied before rendering
//! - **Hooks**: `before_*` / `after_*` callbacks around writes
//!
//! ## Building and rendering
//!
//! ```ignore
//! use sqlxx::prelude::*;
//!
//! let ctx = Context::new(&MYSQL).with_style(ParamStyle::Named);
//!
//! let stmt = select([all()])
//!     .from(name("user"))
//!     .where_expr(and([
//!         name("tenant_id").eq(var("tenant_id", 7)).into(),
//!         in_list(name("id"), "id", [1, 2, 3]).into(),
//!     ]))
//!     .limit(10);
//!
//! let out = ctx.render(&stmt.into())?;
//! // SELECT * FROM `user` WHERE `tenant_id`=:tenant_id AND `id` IN ( :id_0,:id_1,:id_2 ) LIMIT :limit
//! ```
//!
//! ## Entities
//!
//! ```ignore
//! #[derive(sqlxx::Record)]
//! struct Account {
//!     id: i64,
//!     tenant_id: i64,
//!     name: String,
//!     is_deleted: bool,
//! }
//!
//! let mapper = ctx.mapper::<Account>();
//! let delete = mapper.delete_by_id(7, [1, 2])?; // soft delete: UPDATE ... SET `is_deleted`=...
//! ```
//!
//! Nothing here talks to a database. Rendered SQL and arguments are handed
//! to whatever driver the application uses.

pub mod context;
pub mod dialect;
pub mod error;
pub mod expr;
pub mod hooks;
pub mod mapper;
pub mod meta;
pub mod naming;
pub mod prelude;
pub mod render;
pub mod template;
pub mod value;

pub use context::{Context, ContextConfig};
pub use dialect::{Dialect, MYSQL, SQL_SERVER};
pub use error::{KeyKind, SqlxError, SqlxResult};
pub use expr::{Expr, Filters, SimpleQuery};
pub use hooks::{HookEvent, Hooks};
pub use mapper::Mapper;
pub use meta::{Column, Entity, Record};
pub use render::{Args, ParamStyle, Rendered, render};
pub use value::Value;

#[cfg(feature = "derive")]
pub use sqlxx_derive::Record;

// Re-export inventory for use by derive macros
pub use inventory;
