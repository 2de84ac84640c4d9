use std::collections::HashSet;

use futures::future::join_all;
use serde_json::Value;
use tracing::{info, warn};

use super::SyncError;
use crate::{
    Result,
    backend::{Fields, RecordId, RecordStore},
    constants::POSITION_FIELD,
};

/// Outcome of a fully applied [`OrderSync::save_order`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReport {
    pub table: String,
    /// Position writes issued and applied
    pub written: usize,
}

/// Synchronizer for collections of independently stored records.
///
/// Order is persisted as an integer position field on every record.
pub struct OrderSync<'a> {
    store: &'a dyn RecordStore,
    table: String,
    position_field: String,
}

impl<'a> OrderSync<'a> {
    /// Synchronizer writing [`POSITION_FIELD`] on records of `table`.
    pub fn new(store: &'a dyn RecordStore, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
            position_field: POSITION_FIELD.to_string(),
        }
    }

    pub fn with_position_field(mut self, field: impl Into<String>) -> Self {
        self.position_field = field.into();
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn position_field(&self) -> &str {
        &self.position_field
    }

    /// Persists `ids` as the new order: the record at index `i` gets
    /// position `i + 1`.
    ///
    /// One write per record, all issued concurrently; every write is
    /// awaited before returning. If any write fails the others are left in
    /// place and [`SyncError::PartialOrderPersistence`] is returned.
    ///
    /// An id listed twice fails with [`SyncError::DuplicateRecord`] before
    /// any write is issued.
    pub async fn save_order(&self, ids: &[RecordId]) -> Result<OrderReport> {
        let table = self.table.as_str();
        let field = self.position_field.as_str();
        let store = self.store;

        let mut seen = HashSet::with_capacity(ids.len());
        if let Some(&id) = ids.iter().find(|id| !seen.insert(**id)) {
            warn!(table, id, "Order lists a record twice");
            return Err(SyncError::DuplicateRecord {
                table: table.to_string(),
                id,
            }
            .into());
        }

        let writes = ids.iter().enumerate().map(|(index, &id)| async move {
            let mut fields = Fields::new();
            fields.insert(field.to_string(), Value::from(index as i64 + 1));
            (id, store.update_by_id(table, id, fields).await)
        });
        let results = join_all(writes).await;

        let total = results.len();
        let mut failed = Vec::new();
        let mut first_error = None;
        for (id, result) in results {
            if let Err(e) = result {
                warn!(table, id, error = %e, "Position write failed");
                failed.push(id);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            None => {
                info!(table, written = total, "Saved order");
                Ok(OrderReport {
                    table: table.to_string(),
                    written: total,
                })
            }
            Some(first_error) => {
                let applied = total - failed.len();
                warn!(
                    table,
                    applied,
                    total,
                    "Order only partially persisted; reload required"
                );
                Err(SyncError::PartialOrderPersistence {
                    table: table.to_string(),
                    applied,
                    total,
                    failed,
                    first_error: Box::new(first_error),
                }
                .into())
            }
        }
    }
}

/// Writes `fields` to the single record `id`.
///
/// Used for metadata edits outside of reordering. On failure the caller is
/// expected to reload rather than roll back individual fields.
pub async fn update_fields(
    store: &dyn RecordStore,
    table: &str,
    id: RecordId,
    fields: Fields,
) -> Result<()> {
    match store.update_by_id(table, id, fields).await {
        Ok(()) => {
            info!(table, id, "Saved record fields");
            Ok(())
        }
        Err(e) => {
            warn!(table, id, error = %e, "Record write failed");
            Err(SyncError::Persistence {
                target: format!("record {id} in '{table}'"),
                source: Box::new(e),
            }
            .into())
        }
    }
}
