//! File-backed blob storage.
//!
//! [`LocalBlobStore`] writes uploads below a root directory, one
//! subdirectory per bucket, and hands back the URL a static file server
//! would publish them at.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::info;
use url::Url;

use super::{BackendError, BlobStore};
use crate::{Error, Result};

/// Blob store writing to the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    bucket: String,
    public_base: Url,
}

impl LocalBlobStore {
    /// Creates a store writing to `<root>/<bucket>/` and publishing under
    /// `<public_base>/<bucket>/`.
    pub fn new(root: impl Into<PathBuf>, bucket: impl Into<String>, public_base: Url) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.into(),
            public_base,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The URL `path` is served from once stored.
    pub fn public_url(&self, path: &str) -> Result<String> {
        let mut base = self.public_base.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(&format!("{}/{}", self.bucket, path))
            .map(|url| url.to_string())
            .map_err(|_| invalid_path(path))
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let safe = !path.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !safe {
            return Err(invalid_path(path));
        }
        Ok(self.root.join(&self.bucket).join(relative))
    }
}

fn invalid_path(path: &str) -> Error {
    BackendError::InvalidBlobPath {
        path: path.to_string(),
    }
    .into()
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, path: &str, bytes: Vec<u8>) -> Result<String> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| -> Error { BackendError::FileIo { source: e }.into() })?;
        }
        tokio::fs::write(&target, &bytes)
            .await
            .map_err(|e| -> Error { BackendError::FileIo { source: e }.into() })?;

        let url = self.public_url(path)?;
        info!(path, size = bytes.len(), %url, "Stored blob");
        Ok(url)
    }
}
