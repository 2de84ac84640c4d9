use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use super::{ItemId, OrderedItem};
use crate::clock::{Clock, SystemClock};

/// Issues ids of the form `<prefix>-<millis>-<seq>`.
///
/// Every id ever handed out or loaded is remembered, so an id is never
/// issued twice within one collection instance, even after the item that
/// carried it was removed and even when the clock does not move between
/// calls.
#[derive(Debug, Clone)]
struct IdGenerator {
    prefix: String,
    clock: Arc<dyn Clock>,
    next_seq: u64,
    seen: HashSet<ItemId>,
}

impl IdGenerator {
    fn new(prefix: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            prefix: prefix.into(),
            clock,
            next_seq: 0,
            seen: HashSet::new(),
        }
    }

    fn observe(&mut self, id: &ItemId) {
        self.seen.insert(id.clone());
    }

    fn issue(&mut self) -> ItemId {
        let millis = self.clock.now_millis();
        loop {
            let candidate = ItemId::new(format!("{}-{}-{}", self.prefix, millis, self.next_seq));
            self.next_seq += 1;
            if self.seen.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

/// An ordered sequence of [`OrderedItem`]s with id-based editing.
///
/// Order is the vector order. Lookups by an unknown id are reported through
/// the return value and leave the collection unchanged.
#[derive(Debug, Clone)]
pub struct OrderedCollection<T> {
    items: Vec<OrderedItem<T>>,
    ids: IdGenerator,
}

impl<T> OrderedCollection<T> {
    /// Creates an empty collection whose new ids start with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_clock(prefix, Arc::new(SystemClock))
    }

    /// Creates an empty collection reading id timestamps from `clock`.
    pub fn with_clock(prefix: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            items: Vec::new(),
            ids: IdGenerator::new(prefix, clock),
        }
    }

    /// Creates a collection holding `items` in the given order.
    pub fn from_items(
        prefix: impl Into<String>,
        clock: Arc<dyn Clock>,
        items: Vec<OrderedItem<T>>,
    ) -> Self {
        let mut collection = Self::with_clock(prefix, clock);
        collection.replace(items);
        collection
    }

    /// Appends a new item and returns its freshly generated id.
    pub fn insert_at_end(&mut self, payload: T) -> ItemId {
        let id = self.ids.issue();
        debug!(id = %id, position = self.items.len(), "Inserted item at end");
        self.items.push(OrderedItem {
            id: id.clone(),
            payload,
        });
        id
    }

    /// Removes the item with `id`. Returns `false` if no such item exists.
    pub fn remove_by_id(&mut self, id: &ItemId) -> bool {
        match self.position_of(id) {
            Some(index) => {
                self.items.remove(index);
                debug!(id = %id, index, "Removed item");
                true
            }
            None => false,
        }
    }

    /// Replaces the payload of the item with `id`. Returns `false` if no such item exists.
    pub fn update_by_id(&mut self, id: &ItemId, payload: T) -> bool {
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                item.payload = payload;
                true
            }
            None => false,
        }
    }

    /// Replaces the whole sequence, e.g. with the result of a move.
    ///
    /// Ids in `items` are remembered so they are never issued again.
    pub fn replace(&mut self, items: Vec<OrderedItem<T>>) {
        for item in &items {
            self.ids.observe(&item.id);
        }
        self.items = items;
    }

    pub fn get(&self, id: &ItemId) -> Option<&OrderedItem<T>> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn position_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    /// The current order.
    pub fn items(&self) -> &[OrderedItem<T>] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrderedItem<T>> {
        self.items.iter()
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<OrderedItem<T>> {
        self.items
    }
}

impl<T: PartialEq> PartialEq for OrderedCollection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}
