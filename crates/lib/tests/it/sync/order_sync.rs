//! Position writes for externally stored records.

use folio::{
    backend::{Fields, RecordQuery, database::InMemory},
    constants::PROJECT_TABLE,
    sync::{OrderSync, SyncError, update_fields},
};
use serde_json::json;

use crate::helpers::*;

#[tokio::test]
async fn partial_failure_is_reported_and_not_rolled_back() {
    let store = FlakyRecordStore::new(InMemory::new());
    // Stored order is second, first, third; the user drags `first` to the top.
    let ids = seed_projects(&store, &[("first", 2), ("second", 1), ("third", 3)]).await;
    store.fail_updates_of(ids[1]);

    let err = OrderSync::new(&store, PROJECT_TABLE)
        .save_order(&ids)
        .await
        .unwrap_err();

    assert!(err.is_partial_order());
    assert!(err.is_persistence_error());
    match &err {
        folio::Error::Sync(sync_err @ SyncError::PartialOrderPersistence { applied, total, .. }) => {
            assert_eq!((*applied, *total), (2, 3));
            assert_eq!(sync_err.failed_records(), &[ids[1]]);
            assert!(sync_err.requires_reload());
        }
        other => panic!("expected partial order persistence, got {other:?}"),
    }
    // Every write was attempted, second one second.
    assert_eq!(store.update_log(), ids);

    let positions = stored_positions(store.inner()).await;
    assert_eq!(
        positions,
        vec![(ids[0], Some(1)), (ids[1], Some(1)), (ids[2], Some(3))]
    );
}

#[tokio::test]
async fn every_failed_write_is_listed() {
    let store = FlakyRecordStore::new(InMemory::new());
    let ids = seed_projects(&store, &[("a", 1), ("b", 2)]).await;
    store.fail_all_updates();

    let err = OrderSync::new(&store, PROJECT_TABLE)
        .save_order(&[ids[1], ids[0]])
        .await
        .unwrap_err();
    let folio::Error::Sync(sync_err) = &err else {
        panic!("expected a sync error, got {err:?}");
    };
    assert_eq!(sync_err.failed_records(), &[ids[1], ids[0]]);
    assert!(matches!(
        sync_err,
        SyncError::PartialOrderPersistence { applied: 0, .. }
    ));
    assert_eq!(
        stored_positions(store.inner()).await,
        vec![(ids[0], Some(1)), (ids[1], Some(2))]
    );
}

#[tokio::test]
async fn retry_after_heal_converges() {
    let store = FlakyRecordStore::new(InMemory::new());
    let ids = seed_projects(&store, &[("a", 3), ("b", 2), ("c", 1)]).await;
    store.fail_updates_of(ids[2]);
    let sync = OrderSync::new(&store, PROJECT_TABLE);
    assert!(sync.save_order(&ids).await.is_err());

    store.heal();
    let report = sync.save_order(&ids).await.unwrap();
    assert_eq!(report.written, 3);
    assert_eq!(
        stored_positions(store.inner()).await,
        vec![(ids[0], Some(1)), (ids[1], Some(2)), (ids[2], Some(3))]
    );
}

#[tokio::test]
async fn custom_position_field() {
    let stores = test_stores().await;
    let ids = seed_projects(stores.records.as_ref(), &[("a", 1), ("b", 2)]).await;
    OrderSync::new(stores.records.as_ref(), PROJECT_TABLE)
        .with_position_field("rank")
        .save_order(&[ids[1], ids[0]])
        .await
        .unwrap();

    let records = stores
        .records
        .read_all(
            PROJECT_TABLE,
            &RecordQuery::new().order_by("rank", true),
        )
        .await
        .unwrap();
    let order: Vec<_> = records.iter().map(|r| r.id).collect();
    assert_eq!(order, vec![ids[1], ids[0]]);
    assert_eq!(records[0].field("rank"), Some(json!(1)));
}

#[tokio::test]
async fn single_field_update_failure_is_a_persistence_error() {
    let store = FlakyRecordStore::new(InMemory::new());
    let ids = seed_projects(&store, &[("a", 1)]).await;
    store.fail_updates_of(ids[0]);

    let mut fields = Fields::new();
    fields.insert("status".into(), json!("hidden"));
    let err = update_fields(&store, PROJECT_TABLE, ids[0], fields).await.unwrap_err();

    assert!(err.is_persistence_error());
    assert!(!err.is_partial_order());
    assert!(matches!(err, folio::Error::Sync(SyncError::Persistence { .. })));
}

#[tokio::test]
async fn repeated_record_is_refused_before_any_write() {
    let store = FlakyRecordStore::new(InMemory::new());
    let ids = seed_projects(&store, &[("first", 1), ("second", 2)]).await;

    let err = OrderSync::new(&store, PROJECT_TABLE)
        .save_order(&[ids[1], ids[0], ids[1]])
        .await
        .unwrap_err();

    match &err {
        folio::Error::Sync(sync_err) => {
            assert!(sync_err.is_duplicate_record());
            assert!(sync_err.underlying().is_none());
            assert!(!sync_err.requires_reload());
        }
        other => panic!("expected a duplicate record error, got {other:?}"),
    }
    assert!(!err.is_persistence_error());
    assert!(!err.is_partial_order());
    assert!(store.update_log().is_empty());
    assert_eq!(
        stored_positions(store.inner()).await,
        vec![(ids[0], Some(1)), (ids[1], Some(2))]
    );
}
