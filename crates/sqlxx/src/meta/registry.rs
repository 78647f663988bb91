use super::Entity;

/// Registration entry submitted by `#[derive(Record)]`.
pub struct EntityRegistration {
    /// Rust type name of the record.
    pub type_name: &'static str,
    /// Returns the cached metadata of the record.
    pub entity_fn: fn() -> &'static Entity,
}

inventory::collect!(EntityRegistration);

impl EntityRegistration {
    pub fn entity(&self) -> &'static Entity {
        (self.entity_fn)()
    }
}

/// Every record type registered in this binary, in unspecified order.
pub fn registered_entities() -> impl Iterator<Item = &'static EntityRegistration> {
    inventory::iter::<EntityRegistration>.into_iter()
}

/// Look up a registered record by table name.
pub fn find_by_table(table: &str) -> Option<&'static Entity> {
    registered_entities()
        .map(EntityRegistration::entity)
        .find(|entity| entity.table_name() == table)
}
