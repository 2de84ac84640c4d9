//! Storage contracts and their implementations.
//!
//! The core depends on three collaborators, each specified only by the
//! operations the editors need:
//!
//! * [`DocumentStore`]: whole JSON documents addressed by key. Embedded lists
//!   (the About page) live inside one document and are written atomically.
//! * [`RecordStore`]: tables of independently stored records with store
//!   assigned integer ids. Projects live here, each with its own position.
//! * [`BlobStore`]: uploaded files, reduced to the public URL they end up at.
//!
//! Implementations are grouped by category: [`database`] for document and
//! record stores, [`blob`] for file storage.

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

pub mod blob;
pub mod database;

mod errors;
pub use errors::BackendError;

mod record;
pub use record::{Fields, Record, RecordId, RecordQuery, SortKey};

/// Key-addressed JSON documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads the document stored under `key`, or `None` if there is none.
    async fn read_one(&self, key: &str) -> Result<Option<Value>>;

    /// Writes `document` under `key`, replacing any previous version.
    ///
    /// The write is atomic: readers see either the old or the new document.
    async fn write_one(&self, key: &str, document: Value) -> Result<()>;
}

/// Tables of independently stored records.
///
/// There is no cross-record transaction: each call is its own durable write.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns the records of `table` matching `query`, in query order.
    async fn read_all(&self, table: &str, query: &RecordQuery) -> Result<Vec<Record>>;

    /// Inserts a new record and returns its assigned id.
    async fn insert(&self, table: &str, fields: Fields) -> Result<RecordId>;

    /// Merges `fields` into the record `id`. Fields not named are kept.
    async fn update_by_id(&self, table: &str, id: RecordId, fields: Fields) -> Result<()>;

    /// Deletes the record `id`.
    async fn delete_by_id(&self, table: &str, id: RecordId) -> Result<()>;
}

/// Object storage for uploaded files.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` at `path` and returns the URL it is publicly served from.
    async fn put(&self, path: &str, bytes: Vec<u8>) -> Result<String>;
}

/// Rejects field maps the record stores cannot hold.
pub(crate) fn validate_fields(table: &str, fields: &Fields) -> Result<()> {
    if fields.contains_key("id") {
        return Err(BackendError::InvalidFields {
            table: table.to_string(),
            reason: "'id' is assigned by the store and cannot be written".to_string(),
        }
        .into());
    }
    Ok(())
}
