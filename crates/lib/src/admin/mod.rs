//! Admin editors.
//!
//! Each editor ties an [`EditSession`](crate::session::EditSession) to a
//! store through the synchronizers. Editors are constructed per editing
//! session and owned by the caller; nothing here is shared between
//! sessions, and two editors over the same store are not coordinated.

mod about;
mod projects;

pub use about::AboutEditor;
pub use projects::{ProjectBoard, find_project_by_slug, project_query, published_projects};
