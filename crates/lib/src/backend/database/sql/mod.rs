//! SQL backend for Folio storage.
//!
//! Uses sqlx with `AnyPool`, configured for SQLite. The same pool serves
//! both the [`DocumentStore`] and the [`RecordStore`] contracts.
//!
//! ## Schema and Migrations
//!
//! The schema is defined in the [`schema`] module and initialized when
//! connecting. Migrations are code-based functions.

mod storage;

/// Schema definition and migration system.
pub mod schema;

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;

use crate::Result;
use crate::backend::{
    BackendError, DocumentStore, Fields, Record, RecordId, RecordQuery, RecordStore,
};
use crate::constants::{PROJECT_TABLE, SLUG_FIELD};

/// Extension trait for sqlx Result types to simplify error handling.
///
/// Converts sqlx errors to `BackendError::SqlxError` with a context message.
pub(crate) trait SqlxResultExt<T> {
    fn sql_context(self, context: &str) -> Result<T>;
}

impl<T> SqlxResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn sql_context(self, context: &str) -> Result<T> {
        self.map_err(|e| {
            BackendError::SqlxError {
                reason: format!("{context}: {e}"),
                source: Some(e),
            }
            .into()
        })
    }
}

/// SQL-based store implementing the document and record contracts.
///
/// `SqlxBackend` is `Send + Sync`; the sqlx pool handles connection pooling.
/// Unique fields are configured per handle with [`SqlxBackend::with_unique`];
/// `project.slug` is registered by every constructor.
pub struct SqlxBackend {
    pool: AnyPool,
    unique: HashMap<String, Vec<String>>,
}

/// Convenience type alias for the SQLite backend.
pub type Sqlite = SqlxBackend;

impl SqlxBackend {
    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Registers `field` as unique within `table`.
    ///
    /// Only values written after registration are checked.
    pub fn with_unique(mut self, table: &str, field: &str) -> Self {
        let fields = self.unique.entry(table.to_string()).or_default();
        if !fields.iter().any(|f| f == field) {
            fields.push(field.to_string());
        }
        self
    }

    pub(crate) fn unique_fields(&self, table: &str) -> &[String] {
        self.unique.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Open a SQLite database at the given path, creating it if needed.
    pub async fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        // mode=rwc: read-write-create (create file if it doesn't exist)
        let url = format!("sqlite:{}?mode=rwc", path.as_ref().display());
        Self::connect(&url).await
    }

    /// Connect to a SQLite database using a connection URL.
    pub async fn connect(url: &str) -> Result<Self> {
        sqlx::any::install_default_drivers();

        let is_in_memory = url.contains("mode=memory");

        // SQLite admits a single writer at a time. One pooled connection makes
        // concurrent writes queue instead of failing with SQLITE_BUSY.
        let options = AnyPoolOptions::new().max_connections(1);
        // An in-memory database lives only as long as a connection does,
        // so keep that connection open for the lifetime of the pool.
        let options = if is_in_memory {
            options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options
        };
        let pool = options
            .connect(url)
            .await
            .sql_context("Failed to connect to SQLite")?;

        if is_in_memory {
            sqlx::query("PRAGMA busy_timeout = 5000;")
                .execute(&pool)
                .await
                .sql_context("Failed to configure SQLite")?;
        } else {
            sqlx::query(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA busy_timeout = 5000;",
            )
            .execute(&pool)
            .await
            .sql_context("Failed to configure SQLite")?;
        }

        let backend = Self {
            pool,
            unique: HashMap::new(),
        }
        .with_unique(PROJECT_TABLE, SLUG_FIELD);

        schema::initialize(&backend).await?;

        Ok(backend)
    }

    /// Create an in-memory SQLite database for the lifetime of this handle.
    pub async fn in_memory() -> Result<Self> {
        // Shared cache so all pooled connections see the same database; a
        // unique name keeps separate handles apart.
        let unique_id = uuid::Uuid::new_v4();
        let url = format!("sqlite:file:mem_{unique_id}?mode=memory&cache=shared");
        Self::connect(&url).await
    }
}

#[async_trait]
impl DocumentStore for SqlxBackend {
    async fn read_one(&self, key: &str) -> Result<Option<Value>> {
        storage::read_document(self, key).await
    }

    async fn write_one(&self, key: &str, document: Value) -> Result<()> {
        storage::write_document(self, key, &document).await
    }
}

#[async_trait]
impl RecordStore for SqlxBackend {
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
