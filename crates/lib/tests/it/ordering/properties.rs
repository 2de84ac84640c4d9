//! Algebraic properties of `move_item`.

use folio::{OrderedItem, move_item, ordering::OrderingError};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn sequence(len: usize) -> Vec<OrderedItem<String>> {
    (0..len)
        .map(|i| OrderedItem::new(format!("id-{i}"), format!("text {i}")))
        .collect()
}

fn sorted_ids(seq: &[OrderedItem<String>]) -> Vec<String> {
    let mut ids: Vec<_> = seq.iter().map(|item| item.id.to_string()).collect();
    ids.sort();
    ids
}

#[test]
fn move_round_trips_for_random_triples() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..200 {
        let len = rng.gen_range(2..=10);
        let seq = sequence(len);
        let from = rng.gen_range(0..len);
        let to = rng.gen_range(0..len);

        let moved = move_item(&seq, from, to).unwrap();
        assert_eq!(moved.len(), seq.len());
        assert_eq!(sorted_ids(&moved), sorted_ids(&seq));
        assert_eq!(moved[to], seq[from]);

        let restored = move_item(&moved, to, from).unwrap();
        assert_eq!(restored, seq, "len={len} from={from} to={to}");
    }
}

#[test]
fn move_to_same_index_is_identity() {
    for len in 1..=10 {
        let seq = sequence(len);
        for i in 0..len {
            assert_eq!(move_item(&seq, i, i).unwrap(), seq);
        }
    }
}

#[test]
fn move_preserves_payloads() {
    let seq = sequence(5);
    let moved = move_item(&seq, 4, 1).unwrap();
    for item in &moved {
        let original = seq.iter().find(|o| o.id == item.id).unwrap();
        assert_eq!(original.payload, item.payload);
    }
}

#[test]
fn out_of_range_indices_are_rejected() {
    let seq = sequence(3);
    for (from, to) in [(3, 0), (0, 3), (7, 7)] {
        let err = move_item(&seq, from, to).unwrap_err();
        assert!(err.is_index_out_of_range());
        assert!(matches!(err, OrderingError::IndexOutOfRange { len: 3, .. }));
    }
    assert!(move_item::<OrderedItem<String>>(&[], 0, 0).is_err());
}

#[test]
fn scenario_move_first_to_last() {
    let seq = vec![
        OrderedItem::new("a", "X".to_string()),
        OrderedItem::new("b", "Y".to_string()),
        OrderedItem::new("c", "Z".to_string()),
    ];
    let moved = move_item(&seq, 0, 2).unwrap();
    let ids: Vec<_> = moved.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c", "a"]);
    // Input untouched
    assert_eq!(seq[0].id.as_str(), "a");
}
