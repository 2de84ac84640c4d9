//! Backend creation and utility functions.

use std::{path::PathBuf, sync::Arc};

use folio::backend::{
    DocumentStore, RecordStore,
    database::{InMemory, Sqlite},
};

use crate::cli::{Backend, BackendConfig};

/// The stores a command works against.
pub struct Stores {
    pub documents: Arc<dyn DocumentStore>,
    pub records: Arc<dyn RecordStore>,
    /// In-memory backend and the file it is saved to
    snapshot: Option<(Arc<InMemory>, PathBuf)>,
}

impl Stores {
    /// Writes the in-memory backend back to its file. No-op for SQLite.
    pub async fn persist(&self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some((backend, path)) = &self.snapshot {
            backend.save_to_file(path).await?;
            tracing::debug!("Saved data to {}", path.display());
        }
        Ok(())
    }
}

fn data_dir(config: &BackendConfig) -> PathBuf {
    config.data_dir.clone().unwrap_or_else(|| PathBuf::from("."))
}

/// Human-readable description of the configured backend
pub fn backend_label(config: &BackendConfig) -> String {
    let dir = data_dir(config);
    match config.backend {
        Backend::Sqlite => format!("sqlite ({})", dir.join("folio.db").display()),
        Backend::Inmemory => format!("inmemory ({})", dir.join("folio.json").display()),
    }
}

/// Create the appropriate backend based on configuration
pub async fn create_backend(config: &BackendConfig) -> Result<Stores, Box<dyn std::error::Error>> {
    let data_dir = data_dir(config);

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir).await?;

    match config.backend {
        Backend::Sqlite => {
            let db_path = data_dir.join("folio.db");
            tracing::info!("Using SQLite backend at {}", db_path.display());
            let backend = Arc::new(Sqlite::open(&db_path).await?);
            Ok(Stores {
                documents: backend.clone(),
                records: backend,
                snapshot: None,
            })
        }
        Backend::Inmemory => {
            let json_path = data_dir.join("folio.json");
            tracing::info!(
                "Using in-memory backend with persistence at {}",
                json_path.display()
            );
            let backend = Arc::new(InMemory::load_from_file(&json_path).await?);
            Ok(Stores {
                documents: backend.clone(),
                records: backend.clone(),
                snapshot: Some((backend, json_path)),
            })
        }
    }
}
