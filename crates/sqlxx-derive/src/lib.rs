//! Derive macros for sqlxx
//!
//! Provides `#[derive(Record)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod record;

/// Derive the `Record` trait for a struct.
///
/// # Example
///
/// ```ignore
/// use sqlxx::Record;
///
/// #[derive(Record)]
/// #[dbx(table = "user_account")]
/// struct UserAccount {
///     id: i64,
///     #[dbx(tenant_key)]
///     org: i64,
///     #[dbx(markers = "softDelete")]
///     gone: bool,
///     #[dbx(column = "display_name")]
///     name: String,
///     #[dbx(ignore)]
///     cache: Vec<String>,
///     #[dbx(flatten)]
///     audit: Audit,
/// }
/// ```
///
/// # Struct attributes
///
/// - `#[dbx(table = "name")]` - Explicit table name (default: snake-cased type name)
/// - `#[dbx(hooks)]` - The type implements `sqlxx::Hooks`
///
/// # Field attributes
///
/// - `primary_key`, `tenant_key`, `soft_delete` - Key markers; `= false` opts
///   out of the `id` / `tenant_id` / `is_deleted` conventions
/// - `ignore` - Keep the column in metadata but never write it
/// - `flatten` - Splice in the columns of another `Record`
/// - `column = "name"` - Explicit column name
/// - `markers = "primaryKey,_,tenantKey,softDelete"` - Marker list form
#[proc_macro_derive(Record, attributes(dbx))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
