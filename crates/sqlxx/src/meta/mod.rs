//! Entity metadata: table name, ordered columns and key columns.
//!
//! Metadata is declared through the [`Record`] trait, normally derived:
//!
//! ```ignore
//! #[derive(sqlxx::Record)]
//! struct UserAccount {
//!     id: i64,                     // primary key by convention
//!     tenant_id: i64,              // tenant key by convention
//!     #[dbx(markers = "softDelete")]
//!     removed: bool,
//!     name: String,
//! }
//!
//! let entity = UserAccount::entity();
//! assert_eq!(entity.table_name(), "user_account");
//! ```
//!
//! Explicit markers always win; the `id`, `tenant_id` and `is_deleted`
//! conventions only fill flags that were left unspecified.

mod column;
mod entity;
mod registry;

pub use column::{Column, Markers, PRIMARY_KEY_COLUMN, SOFT_DELETE_COLUMN, TENANT_KEY_COLUMN};
pub use entity::{Entity, Record, build_entity};
pub use registry::{EntityRegistration, find_by_table, registered_entities};
