use std::path::Path;

use tracing::debug;
use uuid::Uuid;

use super::ContentError;
use crate::{Result, backend::BlobStore, clock::Clock, constants::MAX_UPLOAD_BYTES};

/// Length of the random part of an object name.
const RANDOM_NAME_LEN: usize = 13;

/// A validated image upload and the object path it will be stored at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    path: String,
    content_type: String,
    size: u64,
}

impl UploadRequest {
    /// Validates an upload and names its object `<folder>/<random>_<millis>.<ext>`.
    ///
    /// Only `image/*` content types up to [`MAX_UPLOAD_BYTES`] are accepted.
    /// The extension is taken from `file_name`, or from the content type
    /// when the name has none.
    pub fn prepare(
        folder: &str,
        file_name: &str,
        content_type: &str,
        size: u64,
        clock: &dyn Clock,
    ) -> std::result::Result<Self, ContentError> {
        let Some(subtype) = content_type.strip_prefix("image/") else {
            return Err(ContentError::NotAnImage {
                content_type: content_type.to_string(),
            });
        };
        if size > MAX_UPLOAD_BYTES {
            return Err(ContentError::FileTooLarge {
                size,
                max: MAX_UPLOAD_BYTES,
            });
        }

        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or(subtype)
            .to_ascii_lowercase();
        let random = Uuid::new_v4().simple().to_string();
        let name = format!(
            "{}_{}.{}",
            &random[..RANDOM_NAME_LEN],
            clock.now_millis(),
            extension
        );
        let folder = folder.trim_matches('/');
        let path = if folder.is_empty() {
            name
        } else {
            format!("{folder}/{name}")
        };

        Ok(Self {
            path,
            content_type: content_type.to_string(),
            size,
        })
    }

    /// Object path inside the bucket.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Stores `bytes` for a prepared request and returns the public URL.
pub async fn upload_image(
    store: &dyn BlobStore,
    request: &UploadRequest,
    bytes: Vec<u8>,
) -> Result<String> {
    let size = bytes.len() as u64;
    if size > MAX_UPLOAD_BYTES {
        return Err(ContentError::FileTooLarge {
            size,
            max: MAX_UPLOAD_BYTES,
        }
        .into());
    }
    debug!(path = request.path(), size, "Uploading image");
    store.put(request.path(), bytes).await
}
