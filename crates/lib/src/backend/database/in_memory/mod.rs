//! In-memory database backend implementation
//!
//! This module provides an in-memory implementation of the document and
//! record store contracts, suitable for testing, development, and small
//! single-process deployments that persist by saving the whole state to a
//! JSON file.

mod persistence;
mod storage;

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::Result;
use crate::backend::{DocumentStore, Fields, Record, RecordId, RecordQuery, RecordStore};
use crate::constants::{PROJECT_TABLE, SLUG_FIELD};

/// Rows of one table plus its id counter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct TableData {
    /// Last id handed out; ids are never reused after a delete.
    pub(crate) last_id: RecordId,
    pub(crate) rows: BTreeMap<RecordId, Fields>,
}

/// A simple in-memory store using `HashMap`s behind async locks.
///
/// Record ids autoincrement per table. Fields registered with
/// [`InMemory::with_unique`] reject duplicate values, the way a unique
/// index would. `project.slug` is registered by [`InMemory::new`].
///
/// Persistence is explicit: [`InMemory::save_to_file`] and
/// [`InMemory::load_from_file`] serialize the whole state as JSON.
#[derive(Debug)]
pub struct InMemory {
    pub(crate) documents: RwLock<HashMap<String, Value>>,
    pub(crate) tables: RwLock<HashMap<String, TableData>>,
    /// table -> unique field names
    pub(crate) unique: RwLock<HashMap<String, Vec<String>>>,
}

impl InMemory {
    /// Creates a new, empty `InMemory` store with the default unique fields.
    pub fn new() -> Self {
        Self::empty().with_unique(PROJECT_TABLE, SLUG_FIELD)
    }

    /// Creates a store without any unique fields.
    pub fn empty() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            tables: RwLock::new(HashMap::new()),
            unique: RwLock::new(HashMap::new()),
        }
    }

    /// Registers `field` as unique within `table`.
    pub fn with_unique(mut self, table: &str, field: &str) -> Self {
        {
            let unique = self.unique.get_mut();
            let fields = unique.entry(table.to_string()).or_default();
            if !fields.iter().any(|f| f == field) {
                fields.push(field.to_string());
            }
        }
        self
    }

    /// Number of records currently stored in `table`.
    pub async fn count(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map(|t| t.rows.len())
            .unwrap_or(0)
    }

    /// Saves the entire state to `path` as JSON.
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persistence::save_to_file(self, path).await
    }

    /// Loads state from a JSON file written by [`InMemory::save_to_file`].
    ///
    /// If the file does not exist, a new, empty store is returned.
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        persistence::load_from_file(path).await
    }
}

impl Default for InMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemory {
    async fn read_one(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn write_one(&self, key: &str, document: Value) -> Result<()> {
        self.documents.write().await.insert(key.to_string(), document);
        Ok(())
    }
}

#[async_trait]
impl RecordStore for InMemory {
    async fn read_all(&self, table: &str, query: &RecordQuery) -> Result<Vec<Record>> {
        storage::read_all(self, table, query).await
    }

    async fn insert(&self, table: &str, fields: Fields) -> Result<RecordId> {
        storage::insert(self, table, fields).await
    }

    async fn update_by_id(&self, table: &str, id: RecordId, fields: Fields) -> Result<()> {
        storage::update(self, table, id, fields).await
    }

    async fn delete_by_id(&self, table: &str, id: RecordId) -> Result<()> {
        storage::delete(self, table, id).await
    }
}
