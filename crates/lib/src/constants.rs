//! Constants used throughout the Folio library.
//!
//! Store keys, table and field names shared between the editors, the
//! synchronizers and the CLI.

/// Document key holding the About page.
pub const ABOUT_KEY: &str = "about";

/// Record table holding projects.
pub const PROJECT_TABLE: &str = "project";

/// Integer field encoding a record's rank within its table.
pub const POSITION_FIELD: &str = "display_order";

/// Creation timestamp field, used as the ordering tie-breaker.
pub const CREATED_AT_FIELD: &str = "created_at";

/// Last-edit timestamp field.
pub const UPDATED_AT_FIELD: &str = "updated_at";

/// Project field that must be unique within the project table.
pub const SLUG_FIELD: &str = "slug";

/// Bucket that uploaded images are stored in.
pub const IMAGE_BUCKET: &str = "images";

/// Largest accepted upload, in bytes (5 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Image shown on the About page until one is uploaded.
pub const DEFAULT_ABOUT_IMAGE: &str = "/images/dummy/studio.jpg";
