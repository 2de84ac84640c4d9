//! InMemory specifics: file persistence and unique field configuration.

use folio::backend::{DocumentStore, Fields, RecordQuery, RecordStore, database::InMemory};
use serde_json::json;

use crate::helpers::*;

#[tokio::test]
async fn projects_and_about_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("folio.json");

    let store = InMemory::new();
    let ids = seed_projects(&store, &[("a", 2), ("b", 1)]).await;
    store
        .write_one("about", json!({"description": "Studio"}))
        .await
        .unwrap();
    store.save_to_file(&path).await.unwrap();

    let restored = InMemory::load_from_file(&path).await.unwrap();
    assert_eq!(stored_positions(&restored).await, stored_positions(&store).await);
    assert_eq!(
        restored.read_one("about").await.unwrap(),
        Some(json!({"description": "Studio"}))
    );
    assert_eq!(restored.count("project").await, ids.len());
}

#[tokio::test]
async fn empty_store_has_no_unique_fields() {
    let store = InMemory::empty();
    let mut fields = Fields::new();
    fields.insert("slug".into(), json!("dup"));
    store.insert("project", fields.clone()).await.unwrap();
    store.insert("project", fields).await.unwrap();
    assert_eq!(store.count("project").await, 2);
}

#[tokio::test]
async fn extra_unique_fields_can_be_registered() {
    let store = InMemory::new().with_unique("tag", "name");
    let mut fields = Fields::new();
    fields.insert("name".into(), json!("oak"));
    store.insert("tag", fields.clone()).await.unwrap();
    assert!(store.insert("tag", fields).await.unwrap_err().is_conflict());

    // Null values never conflict.
    let mut unnamed = Fields::new();
    unnamed.insert("name".into(), json!(null));
    store.insert("tag", unnamed.clone()).await.unwrap();
    store.insert("tag", unnamed).await.unwrap();
    assert_eq!(
        store.read_all("tag", &RecordQuery::new()).await.unwrap().len(),
        3
    );
}
