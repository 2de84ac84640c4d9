//! Persistence synchronizers.
//!
//! The synchronizers are the only part of the library that performs I/O on
//! behalf of an editing session. They translate the session's live state
//! into writes against a backing store and report the outcome; callers
//! decide whether to `mark_synced`, keep the dirty state for a retry, or
//! reload.
//!
//! * [`DocumentSync`] writes an embedded list as part of one document, in a
//!   single atomic write.
//! * [`OrderSync`] writes one position per record. Writes are issued
//!   concurrently and are not rolled back when some of them fail.
//! * [`update_fields`] is the single-record write used for metadata edits.

mod document;
mod errors;
mod order;

pub use document::DocumentSync;
pub use errors::SyncError;
pub use order::{OrderReport, OrderSync, update_fields};
