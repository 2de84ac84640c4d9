//! Error types for the storage backends.
//!
//! Every backing-store failure surfaces as a [`BackendError`]. The
//! synchronizers wrap these into [`crate::sync::SyncError`] so callers can
//! tell a single failed write from a partially applied reorder.

use thiserror::Error;

use super::RecordId;

/// Errors that can occur during store operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// Record not found by id.
    #[error("Record {id} not found in table '{table}'")]
    RecordNotFound {
        /// The table that was searched
        table: String,
        /// The missing record id
        id: RecordId,
    },

    /// A write would duplicate a value in a unique field.
    #[error("Duplicate value for unique field '{table}.{field}': {value}")]
    UniqueViolation {
        /// The table holding the constraint
        table: String,
        /// The constrained field
        field: String,
        /// The rejected value, rendered as JSON
        value: String,
    },

    /// Record fields were not a JSON object or used a reserved name.
    #[error("Invalid fields for table '{table}': {reason}")]
    InvalidFields {
        /// The table being written
        table: String,
        /// Why the fields were rejected
        reason: String,
    },

    /// The store refused or failed a write for a reason of its own.
    #[error("Write rejected: {reason}")]
    WriteRejected {
        /// Description of the failure
        reason: String,
    },

    /// Blob path was empty, absolute, or escaped the bucket.
    #[error("Invalid blob path: {path}")]
    InvalidBlobPath {
        /// The rejected path
        path: String,
    },

    /// Serialization failed.
    #[error("Serialization failed")]
    SerializationFailed {
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// Deserialization failed.
    #[error("Deserialization failed")]
    DeserializationFailed {
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// File I/O error.
    #[error("File I/O error")]
    FileIo {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// SQL backend error.
    #[cfg(feature = "sqlite")]
    #[error("SQL error: {reason}")]
    SqlxError {
        /// Description including the failing operation
        reason: String,
        /// The underlying sqlx error, if any
        #[source]
        source: Option<sqlx::Error>,
    },
}

impl BackendError {
    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::RecordNotFound { .. })
    }

    /// Check if this error is a unique constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, BackendError::UniqueViolation { .. })
    }

    /// Check if this error is related to I/O operations.
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            BackendError::FileIo { .. }
                | BackendError::SerializationFailed { .. }
                | BackendError::DeserializationFailed { .. }
        )
    }

    /// Check if the caller supplied data the store cannot accept.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            BackendError::InvalidFields { .. } | BackendError::InvalidBlobPath { .. }
        )
    }

    /// Get the record id if this error is about a specific record.
    pub fn record_id(&self) -> Option<RecordId> {
        match self {
            BackendError::RecordNotFound { id, .. } => Some(*id),
            _ => None,
        }
    }
}

impl From<BackendError> for crate::Error {
    fn from(err: BackendError) -> Self {
        crate::Error::Backend(err)
    }
}
