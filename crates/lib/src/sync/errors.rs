//! Error types for the persistence synchronizers.

use thiserror::Error;

use crate::backend::RecordId;

/// Failures surfaced by the synchronizers.
///
/// Every variant leaves the editing session's live state and dirty flag as
/// they were, so no edit is lost. They differ in what the caller must do
/// next: a [`SyncError::Persistence`] can be retried as is, while a
/// [`SyncError::PartialOrderPersistence`] requires a reload first. A
/// [`SyncError::DuplicateRecord`] is rejected before anything is written.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SyncError {
    /// A single write against the backing store failed.
    #[error("Failed to save {target}: {source}")]
    Persistence {
        /// What was being written, e.g. `document 'about'`
        target: String,
        /// The store failure
        #[source]
        source: Box<crate::Error>,
    },

    /// Some position writes of a reorder failed; the ones that succeeded
    /// were not rolled back.
    #[error(
        "Saved {applied} of {total} positions in '{table}' ({} failed); reload before retrying",
        failed.len()
    )]
    PartialOrderPersistence {
        /// The record table being reordered
        table: String,
        /// Writes that succeeded
        applied: usize,
        /// Writes issued
        total: usize,
        /// Records whose position write failed
        failed: Vec<RecordId>,
        /// The first failure, in issue order
        #[source]
        first_error: Box<crate::Error>,
    },

    /// An order listed the same record twice. Nothing was written.
    #[error("Record {id} appears more than once in the order for '{table}'")]
    DuplicateRecord {
        /// The record table being reordered
        table: String,
        /// The repeated record
        id: RecordId,
    },
}

impl SyncError {
    /// Check if this is a partially applied reorder.
    pub fn is_partial_order(&self) -> bool {
        matches!(self, SyncError::PartialOrderPersistence { .. })
    }

    /// Check if an order was refused because it repeated a record.
    pub fn is_duplicate_record(&self) -> bool {
        matches!(self, SyncError::DuplicateRecord { .. })
    }

    /// Check if the store no longer knows a record that was written.
    pub fn is_not_found(&self) -> bool {
        self.underlying().is_some_and(crate::Error::is_not_found)
    }

    /// Check if the write hit a unique constraint.
    pub fn is_unique_violation(&self) -> bool {
        self.underlying().is_some_and(crate::Error::is_conflict)
    }

    /// Whether local state may now disagree with the store in ways only a
    /// reload can reveal.
    pub fn requires_reload(&self) -> bool {
        self.is_partial_order()
    }

    /// Records whose position write failed, if this is a partial reorder.
    pub fn failed_records(&self) -> &[RecordId] {
        match self {
            SyncError::PartialOrderPersistence { failed, .. } => failed,
            _ => &[],
        }
    }

    /// The store error behind this failure, if a write was attempted.
    pub fn underlying(&self) -> Option<&crate::Error> {
        match self {
            SyncError::Persistence { source, .. } => Some(source),
            SyncError::PartialOrderPersistence { first_error, .. } => Some(first_error),
            SyncError::DuplicateRecord { .. } => None,
        }
    }
}

impl From<SyncError> for crate::Error {
    fn from(err: SyncError) -> Self {
        crate::Error::Sync(err)
    }
}
