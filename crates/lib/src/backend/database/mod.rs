//! Database-style backend implementations
//!
//! These backends implement both [`DocumentStore`](crate::backend::DocumentStore)
//! and [`RecordStore`](crate::backend::RecordStore).

mod in_memory;
#[cfg(feature = "sqlite")]
pub mod sql;

pub use in_memory::InMemory;
#[cfg(feature = "sqlite")]
pub use sql::Sqlite;

use serde_json::Value;

use crate::Result;
use crate::backend::{BackendError, Fields, RecordId};

/// Fails if writing `fields` to record `id` would duplicate a value held by
/// another record in any of the `unique` fields.
///
/// `existing` yields every other stored record of the table.
pub(crate) fn check_unique<'a>(
    table: &str,
    unique: &[String],
    id: Option<RecordId>,
    fields: &Fields,
    existing: impl Iterator<Item = (RecordId, &'a Fields)> + Clone,
) -> Result<()> {
    for field in unique {
        let Some(value) = fields.get(field).filter(|v| !v.is_null()) else {
            continue;
        };
        let clash = existing
            .clone()
            .any(|(other_id, other)| Some(other_id) != id && other.get(field) == Some(value));
        if clash {
            return Err(unique_violation(table, field, value));
        }
    }
    Ok(())
}

pub(crate) fn unique_violation(table: &str, field: &str, value: &Value) -> crate::Error {
    BackendError::UniqueViolation {
        table: table.to_string(),
        field: field.to_string(),
        value: value.to_string(),
    }
    .into()
}
