//! Whole-document writes for embedded lists.

use folio::{
    backend::{DocumentStore, database::InMemory},
    constants::ABOUT_KEY,
    sync::{DocumentSync, SyncError},
};
use serde_json::json;

use crate::helpers::*;

#[tokio::test]
async fn save_is_exactly_one_write() {
    let store = FlakyDocumentStore::new(InMemory::new());
    let sync = DocumentSync::new(&store, ABOUT_KEY);

    sync.save(&json!({"clients": [{"id": "a", "text": "Acme"}]}))
        .await
        .unwrap();
    assert_eq!(store.write_count(), 1);
}

#[tokio::test]
async fn failed_save_leaves_stored_document_intact() {
    let store = FlakyDocumentStore::new(InMemory::new());
    let sync = DocumentSync::new(&store, ABOUT_KEY);
    sync.save(&json!({"description": "v1"})).await.unwrap();

    store.set_failing(true);
    let err = sync.save(&json!({"description": "v2"})).await.unwrap_err();
    assert!(matches!(err, folio::Error::Sync(SyncError::Persistence { .. })));
    assert!(err.is_persistence_error());
    assert!(!err.is_partial_order());

    assert_eq!(
        store.read_one(ABOUT_KEY).await.unwrap(),
        Some(json!({"description": "v1"}))
    );
}

#[tokio::test]
async fn typed_documents_round_trip() {
    let stores = test_stores().await;
    let sync = DocumentSync::new(stores.documents.as_ref(), "settings");
    assert_eq!(sync.load_as::<Vec<String>>().await.unwrap(), None);

    sync.save(&vec!["a".to_string(), "b".to_string()]).await.unwrap();
    assert_eq!(
        sync.load_as::<Vec<String>>().await.unwrap(),
        Some(vec!["a".to_string(), "b".to_string()])
    );
}
