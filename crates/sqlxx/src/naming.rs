//! Field and type name conversion.

use heck::ToSnakeCase;

/// Convert a capitalised or camel-cased name to lower snake case.
///
/// Dotted paths are converted segment by segment, so `User.TenantID`
/// becomes `user.tenant_id`.
pub fn to_snake(name: &str) -> String {
    if !name.contains('.') {
        return name.to_snake_case();
    }
    name.split('.')
        .map(|part| part.to_snake_case())
        .collect::<Vec<_>>()
        .join(".")
}
