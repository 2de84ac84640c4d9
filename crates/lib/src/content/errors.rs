//! Error types for content validation.

use thiserror::Error;

use crate::backend::RecordId;

/// Content that cannot be stored or was stored in an unreadable shape.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ContentError {
    /// A required field was empty.
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the empty field
        field: &'static str,
    },

    /// A slug contained characters that are not URL safe.
    #[error(
        "Invalid slug '{slug}': use only letters, digits, '-', '_', '.' and '~', without spaces"
    )]
    InvalidSlug {
        /// The rejected slug
        slug: String,
    },

    /// An upload was not an image.
    #[error("Only image uploads are accepted, got '{content_type}'")]
    NotAnImage {
        /// The declared content type
        content_type: String,
    },

    /// An upload exceeded the size limit.
    #[error("File of {size} bytes exceeds the {max} byte limit")]
    FileTooLarge {
        /// Size of the rejected file
        size: u64,
        /// The configured limit
        max: u64,
    },

    /// A stored document does not have a shape that can be read.
    #[error("Invalid document '{key}': {reason}")]
    InvalidDocument {
        /// Document key
        key: String,
        /// What was wrong with it
        reason: String,
    },

    /// A stored record could not be decoded.
    #[error("Invalid record {id}: {source}")]
    InvalidRecord {
        /// The record id
        id: RecordId,
        /// The decoding failure
        #[source]
        source: serde_json::Error,
    },

    /// Project contents could not be encoded for writing.
    #[error("Failed to encode project contents")]
    SerializationFailed {
        /// The encoding failure
        #[source]
        source: serde_json::Error,
    },

    /// A section or field name was not recognised.
    #[error("Unknown {kind} '{name}'")]
    UnknownName {
        /// What was being named, e.g. `section`
        kind: &'static str,
        /// The name given
        name: String,
    },
}

impl ContentError {
    /// Check if the error came from slug validation.
    pub fn is_invalid_slug(&self) -> bool {
        matches!(self, ContentError::InvalidSlug { .. })
    }

    /// Check if an upload was refused before anything was stored.
    pub fn is_upload_rejected(&self) -> bool {
        matches!(
            self,
            ContentError::NotAnImage { .. } | ContentError::FileTooLarge { .. }
        )
    }

    /// Check if stored data could not be decoded.
    pub fn is_corrupt_data(&self) -> bool {
        matches!(
            self,
            ContentError::InvalidDocument { .. } | ContentError::InvalidRecord { .. }
        )
    }
}

impl From<ContentError> for crate::Error {
    fn from(err: ContentError) -> Self {
        crate::Error::Content(err)
    }
}
