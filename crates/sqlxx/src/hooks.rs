//! Lifecycle hooks for records.
//!
//! A record opts in by implementing [`Hooks`] and returning itself from
//! [`Record::as_hooks`] (`#[dbx(hooks)]` with the derive). Records without
//! hooks are skipped.

use crate::error::SqlxResult;
use crate::meta::Record;
use std::fmt;

/// The write operation a hook runs around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookEvent {
    Insert,
    Update,
    Delete,
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookEvent::Insert => f.write_str("insert"),
            HookEvent::Update => f.write_str("update"),
            HookEvent::Delete => f.write_str("delete"),
        }
    }
}

/// Callbacks around writes. Every method defaults to a no-op.
///
/// A `before_*` error aborts the operation before any statement is built.
pub trait Hooks {
    fn before_insert(&mut self) -> SqlxResult<()> {
        Ok(())
    }

    fn after_insert(&mut self) -> SqlxResult<()> {
        Ok(())
    }

    fn before_update(&mut self) -> SqlxResult<()> {
        Ok(())
    }

    fn after_update(&mut self) -> SqlxResult<()> {
        Ok(())
    }

    fn before_delete(&mut self) -> SqlxResult<()> {
        Ok(())
    }

    fn after_delete(&mut self) -> SqlxResult<()> {
        Ok(())
    }
}

/// Run the `before_*` hook of `event` on every record that has hooks.
pub fn run_before<T: Record>(event: HookEvent, records: &mut [T]) -> SqlxResult<()> {
    for record in records.iter_mut() {
        if let Some(hooks) = record.as_hooks() {
            match event {
                HookEvent::Insert => hooks.before_insert()?,
                HookEvent::Update => hooks.before_update()?,
                HookEvent::Delete => hooks.before_delete()?,
            }
        }
    }
    Ok(())
}

/// Run the `after_*` hook of `event` on every record that has hooks.
pub fn run_after<T: Record>(event: HookEvent, records: &mut [T]) -> SqlxResult<()> {
    for record in records.iter_mut() {
        if let Some(hooks) = record.as_hooks() {
            match event {
                HookEvent::Insert => hooks.after_insert()?,
                HookEvent::Update => hooks.after_update()?,
                HookEvent::Delete => hooks.after_delete()?,
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SqlxError;
    use crate::meta::{Column, Entity, build_entity};
    use crate::value::Value;
    use std::sync::OnceLock;

    struct Audited {
        name: String,
        calls: Vec<&'static str>,
    }

    impl Hooks for Audited {
        fn before_insert(&mut self) -> SqlxResult<()> {
            if self.name.is_empty() {
                return Err(SqlxError::hook("name is required"));
            }
            self.calls.push("before_insert");
            Ok(())
        }

        fn after_insert(&mut self) -> SqlxResult<()> {
            self.calls.push("after_insert");
            Ok(())
        }
    }

    impl Record for Audited {
        fn table_name() -> &'static str {
            "audited"
        }

        fn collect_columns(columns: &mut Vec<Column>) {
            columns.push(Column::new("name"));
        }

        fn entity() -> &'static Entity {
            static ENTITY: OnceLock<Entity> = OnceLock::new();
            ENTITY.get_or_init(build_entity::<Self>)
        }

        fn collect_values(&self, values: &mut Vec<Value>) {
            values.push(Value::from(&self.name));
        }

        fn as_hooks(&mut self) -> Option<&mut dyn Hooks> {
            Some(self)
        }
    }

    #[test]
    fn dispatches_to_records_with_hooks() {
        let mut records = vec![Audited {
            name: "a".into(),
            calls: Vec::new(),
        }];
        run_before(HookEvent::Insert, &mut records).unwrap();
        run_after(HookEvent::Insert, &mut records).unwrap();
        run_before(HookEvent::Update, &mut records).unwrap();
        assert_eq!(records[0].calls, vec!["before_insert", "after_insert"]);
    }

    #[test]
    fn before_hook_error_propagates() {
        let mut records = vec![Audited {
            name: String::new(),
            calls: Vec::new(),
        }];
        let err = run_before(HookEvent::Insert, &mut records).unwrap_err();
        assert!(matches!(err, SqlxError::Hook(_)));
    }
}
