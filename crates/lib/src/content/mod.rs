//! Portfolio content: the About page document, project records and image
//! uploads.
//!
//! These types give the editors in [`crate::admin`] something concrete to
//! order and persist. The About page is a single document with embedded
//! lists; projects are independent records ranked by a position field.

mod about;
mod errors;
mod project;
mod upload;

pub use about::{AboutField, AboutPage, ListField, ListItem, Section};
pub use errors::ContentError;
pub use project::{
    DetailImage, Project, ProjectContent, ProjectDraft, ProjectStatus, parse_keywords,
    validate_slug,
};
pub use upload::{UploadRequest, upload_image};
