//! The optimistic mutation controller.
//!
//! An [`EditSession`] is created per editing session and owned by the caller.
//! Every mutation is applied to the live collection immediately and is
//! visible right away; the session only tracks how the live state relates to
//! the last state known to be durable. It never touches a store: writing is
//! the job of the synchronizers in [`crate::sync`], after which the caller
//! reports success through [`EditSession::mark_synced`].

use std::sync::Arc;

use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::ordering::{ItemId, OrderedCollection, OrderedItem, OrderingError, move_item};

/// How an [`EditSession`] decides whether it holds unsaved changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyTracking {
    /// Embedded lists: edits, inserts and removals are compared structurally
    /// with the snapshot, so reverting an edit makes the session clean again.
    /// A move always marks the session dirty.
    Structural,
    /// External records: any reorder or changing edit marks the session dirty,
    /// and it stays dirty until [`EditSession::mark_synced`] or a reload.
    Sticky,
}

/// Live, editable collection plus the last synchronized snapshot.
#[derive(Debug, Clone)]
pub struct EditSession<T> {
    live: OrderedCollection<T>,
    snapshot: Vec<OrderedItem<T>>,
    dirty: bool,
    tracking: DirtyTracking,
}

impl<T: Clone + PartialEq> EditSession<T> {
    /// Creates an empty, clean session using the system clock for new ids.
    pub fn new(tracking: DirtyTracking, id_prefix: impl Into<String>) -> Self {
        Self::with_clock(tracking, id_prefix, Arc::new(SystemClock))
    }

    pub fn with_clock(
        tracking: DirtyTracking,
        id_prefix: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            live: OrderedCollection::with_clock(id_prefix, clock),
            snapshot: Vec::new(),
            dirty: false,
            tracking,
        }
    }

    /// Replaces both the live state and the snapshot with `items` and clears
    /// the dirty flag.
    pub fn load(&mut self, items: Vec<OrderedItem<T>>) {
        debug!(len = items.len(), "Loading edit session");
        self.snapshot = items.clone();
        self.live.replace(items);
        self.dirty = false;
    }

    /// Moves the item at `from` to `to` in the live state.
    ///
    /// Invalid indices leave the session untouched. `from == to` is a no-op
    /// that leaves the dirty flag as it was; any other move marks the session
    /// dirty in both tracking modes.
    pub fn apply_move(&mut self, from: usize, to: usize) -> Result<(), OrderingError> {
        let moved = move_item(self.live.items(), from, to)?;
        if from == to {
            return Ok(());
        }
        self.live.replace(moved);
        debug!(from, to, "Applied move");
        self.dirty = true;
        Ok(())
    }

    /// Replaces the payload of `id`. Returns `false` if the id is unknown.
    pub fn apply_edit(&mut self, id: &ItemId, payload: T) -> bool {
        let changed = match self.live.get(id) {
            Some(item) => item.payload != payload,
            None => return false,
        };
        self.live.update_by_id(id, payload);
        self.record_change(changed);
        true
    }

    /// Puts back a payload and dirty flag captured before an optimistic edit.
    ///
    /// Used when a single-record write failed and the store could not be
    /// reloaded either. Returns `false` if the id is unknown.
    pub fn revert_edit(&mut self, id: &ItemId, payload: T, dirty: bool) -> bool {
        if !self.live.update_by_id(id, payload) {
            return false;
        }
        debug!(id = id.as_str(), "Reverted edit");
        self.dirty = dirty;
        true
    }

    /// Appends a new item with a freshly generated id.
    pub fn insert(&mut self, payload: T) -> ItemId {
        let id = self.live.insert_at_end(payload);
        self.record_change(true);
        id
    }

    /// Removes `id`. Returns `false` if the id is unknown.
    pub fn remove(&mut self, id: &ItemId) -> bool {
        let removed = self.live.remove_by_id(id);
        if removed {
            self.record_change(true);
        }
        removed
    }

    /// Records a successful persistence round: the live state becomes the
    /// snapshot and the session is clean.
    pub fn mark_synced(&mut self) {
        self.snapshot = self.live.items().to_vec();
        self.dirty = false;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn tracking(&self) -> DirtyTracking {
        self.tracking
    }

    /// The live sequence, including unsaved changes.
    pub fn items(&self) -> &[OrderedItem<T>] {
        self.live.items()
    }

    /// The last sequence known to be durable.
    pub fn snapshot(&self) -> &[OrderedItem<T>] {
        &self.snapshot
    }

    pub fn get(&self, id: &ItemId) -> Option<&OrderedItem<T>> {
        self.live.get(id)
    }

    pub fn position_of(&self, id: &ItemId) -> Option<usize> {
        self.live.position_of(id)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    fn record_change(&mut self, changed: bool) {
        self.dirty = match self.tracking {
            DirtyTracking::Structural => self.live.items() != self.snapshot.as_slice(),
            DirtyTracking::Sticky => self.dirty || changed,
        };
    }
}
