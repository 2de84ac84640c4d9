use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{info, warn};

use super::SyncError;
use crate::{
    Error, Result,
    backend::{BackendError, DocumentStore},
};

/// Synchronizer for collections embedded in one document.
///
/// The whole document is the unit of persistence, so a save either lands
/// completely or not at all.
pub struct DocumentSync<'a> {
    store: &'a dyn DocumentStore,
    key: String,
}

impl<'a> DocumentSync<'a> {
    pub fn new(store: &'a dyn DocumentStore, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the raw document, `None` if the store has none under this key.
    pub async fn load(&self) -> Result<Option<Value>> {
        self.store.read_one(&self.key).await
    }

    /// Writes `document` with exactly one store write.
    ///
    /// A failed write is returned as [`SyncError::Persistence`]; nothing is
    /// retried.
    pub async fn save<D: Serialize>(&self, document: &D) -> Result<()> {
        let value = serde_json::to_value(document)
            .map_err(|e| -> Error { BackendError::SerializationFailed { source: e }.into() })?;

        match self.store.write_one(&self.key, value).await {
            Ok(()) => {
                info!(key = %self.key, "Saved document");
                Ok(())
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Document write failed");
                Err(SyncError::Persistence {
                    target: format!("document '{}'", self.key),
                    source: Box::new(e),
                }
                .into())
            }
        }
    }

    /// Reads and decodes the document into `D`.
    pub async fn load_as<D: DeserializeOwned>(&self) -> Result<Option<D>> {
        self.load()
            .await?
            .map(|value| {
                serde_json::from_value(value).map_err(|e| -> Error {
                    BackendError::DeserializationFailed { source: e }.into()
                })
            })
            .transpose()
    }
}
