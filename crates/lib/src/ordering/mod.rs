//! Ordered collections and the reorder-by-index move.
//!
//! An [`OrderedCollection`] is the in-memory sequence both list shapes share:
//! the embedded lists inside one document and the externally stored records
//! that carry a position field. [`move_item`] is the pure splice applied when
//! a drag ends; the input device is irrelevant, only the resulting
//! `(from, to)` index pair is.

mod collection;
mod errors;
mod item;
mod moves;

pub use collection::OrderedCollection;
pub use errors::OrderingError;
pub use item::{ItemId, OrderedItem};
pub use moves::move_item;
