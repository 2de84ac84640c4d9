//!
//! Folio: the content core of a portfolio site and its admin dashboard.
//!
//! The library keeps ordered collections of content consistent between an
//! editable, optimistic in-memory view and a durable backing store.
//!
//! ## Core Concepts
//!
//! * **Ordered collections (`ordering::OrderedCollection`)**: sequences of
//!   `OrderedItem<T>` with client-generated, never-reused ids, plus the pure
//!   `ordering::move_item` splice used for drag-and-drop reordering.
//! * **Edit sessions (`session::EditSession`)**: the per-session controller
//!   that owns the live collection, the last synchronized snapshot and the
//!   dirty flag. It never performs I/O.
//! * **Synchronizers (`sync`)**: the only I/O path. `DocumentSync` writes an
//!   embedded list as part of one document; `OrderSync` writes one position
//!   per record, concurrently, without cross-record atomicity.
//! * **Backends (`backend`)**: the `DocumentStore`, `RecordStore` and
//!   `BlobStore` contracts with in-memory, SQLite and filesystem
//!   implementations.
//! * **Content (`content`)** and **admin (`admin`)**: the About page
//!   document, project records, image uploads, and the editors that drive
//!   them.

pub mod admin;
pub mod backend;
pub mod clock;
pub mod constants;
pub mod content;
pub mod ordering;
pub mod session;
pub mod sync;

#[cfg(any(test, feature = "testing"))]
pub use clock::FixedClock;
pub use clock::{Clock, SystemClock};
pub use ordering::{ItemId, OrderedCollection, OrderedItem, move_item};
pub use session::{DirtyTracking, EditSession};

/// Result type used throughout the Folio library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Folio library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured errors from the ordering module
    #[error(transparent)]
    Ordering(ordering::OrderingError),

    /// Structured errors from the storage backends
    #[error(transparent)]
    Backend(backend::BackendError),

    /// Structured errors from the persistence synchronizers
    #[error(transparent)]
    Sync(sync::SyncError),

    /// Structured errors from content validation
    #[error(transparent)]
    Content(content::ContentError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Ordering(_) => "ordering",
            Error::Backend(_) => "backend",
            Error::Sync(_) => "sync",
            Error::Content(_) => "content",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Backend(backend_err) => backend_err.is_not_found(),
            Error::Sync(sync_err) => sync_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error is a failed write against the backing store.
    ///
    /// Both single-write failures and partial order persistence count.
    pub fn is_persistence_error(&self) -> bool {
        match self {
            Error::Sync(sync_err) => sync_err.underlying().is_some(),
            Error::Backend(_) => true,
            _ => false,
        }
    }

    /// Check if this error means some, but not all, position writes landed.
    ///
    /// Callers must reload from the store before retrying.
    pub fn is_partial_order(&self) -> bool {
        match self {
            Error::Sync(sync_err) => sync_err.is_partial_order(),
            _ => false,
        }
    }

    /// Check if this error is a unique constraint violation (e.g. a duplicate slug).
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Backend(backend_err) => backend_err.is_unique_violation(),
            Error::Sync(sync_err) => sync_err.is_unique_violation(),
            _ => false,
        }
    }

    /// Check if this error is an invalid index passed to a move.
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(self, Error::Ordering(_))
    }

    /// Check if this error is a content validation failure.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Content(_))
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        match self {
            Error::Io(_) => true,
            Error::Backend(backend_err) => backend_err.is_io_error(),
            _ => false,
        }
    }
}
