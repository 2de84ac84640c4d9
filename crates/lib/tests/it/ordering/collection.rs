//! Id guarantees of `OrderedCollection`.

use std::{collections::HashSet, sync::Arc};

use folio::{FixedClock, ItemId, OrderedCollection, OrderedItem};

#[test]
fn ids_are_unique_across_inserts_and_removals() {
    let clock = Arc::new(FixedClock::default());
    let mut collection: OrderedCollection<u32> =
        OrderedCollection::with_clock("item", clock.clone());
    let _hold = clock.hold();

    let mut issued = HashSet::new();
    for round in 0..50 {
        let id = collection.insert_at_end(round);
        assert!(issued.insert(id.clone()), "id {id} issued twice");
        if round % 3 == 0 {
            assert!(collection.remove_by_id(&id));
        }
    }
    assert_eq!(collection.len(), 50 - 17);
}

#[test]
fn loaded_items_keep_their_ids_and_order() {
    let items = vec![OrderedItem::new("x", 1), OrderedItem::new("y", 2)];
    let mut collection =
        OrderedCollection::from_items("item", Arc::new(FixedClock::default()), items.clone());
    assert_eq!(collection.items(), items.as_slice());

    assert!(collection.update_by_id(&ItemId::from("y"), 20));
    assert!(!collection.update_by_id(&ItemId::from("z"), 30));
    assert_eq!(collection.get(&ItemId::from("y")).unwrap().payload, 20);
    assert_eq!(collection.position_of(&ItemId::from("y")), Some(1));
}

#[test]
fn missing_ids_are_reported_not_raised() {
    let mut collection = OrderedCollection::from_items(
        "item",
        Arc::new(FixedClock::default()),
        vec![
            OrderedItem::new("a", "X"),
            OrderedItem::new("b", "Y"),
            OrderedItem::new("c", "Z"),
        ],
    );
    let before = collection.clone();
    assert!(!collection.remove_by_id(&ItemId::from("nope")));
    assert_eq!(collection, before);
    assert_eq!(collection.len(), 3);
}
