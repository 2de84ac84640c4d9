//! The store contracts, run against every backend.

use folio::backend::{
    DocumentStore, Fields, RecordQuery, RecordStore,
    database::{InMemory, Sqlite},
};
use serde_json::json;

fn fields(value: serde_json::Value) -> Fields {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

async fn backends() -> Vec<(&'static str, Box<dyn ContractStore>)> {
    let in_memory: Box<dyn ContractStore> = Box::new(InMemory::new());
    let sqlite: Box<dyn ContractStore> = Box::new(Sqlite::in_memory().await.unwrap());
    vec![("inmemory", in_memory), ("sqlite", sqlite)]
}

trait ContractStore: DocumentStore + RecordStore {
    fn records(&self) -> &dyn RecordStore;
    fn documents(&self) -> &dyn DocumentStore;
}

impl<S: DocumentStore + RecordStore> ContractStore for S {
    fn records(&self) -> &dyn RecordStore {
        self
    }

    fn documents(&self) -> &dyn DocumentStore {
        self
    }
}

#[tokio::test]
async fn documents_read_back_what_was_written() {
    for (name, store) in backends().await {
        let docs = store.documents();
        assert_eq!(docs.read_one("about").await.unwrap(), None, "{name}");

        docs.write_one("about", json!({"a": 1})).await.unwrap();
        docs.write_one("about", json!({"a": 2, "b": [1, 2]})).await.unwrap();
        docs.write_one("other", json!("plain")).await.unwrap();

        assert_eq!(
            docs.read_one("about").await.unwrap(),
            Some(json!({"a": 2, "b": [1, 2]})),
            "{name}"
        );
        assert_eq!(docs.read_one("other").await.unwrap(), Some(json!("plain")));
    }
}

#[tokio::test]
async fn records_crud() {
    for (name, store) in backends().await {
        let records = store.records();
        let id = records
            .insert("project", fields(json!({"title": "A", "slug": "a", "n": 1})))
            .await
            .unwrap();

        records
            .update_by_id("project", id, fields(json!({"n": 2})))
            .await
            .unwrap();
        let all = records.read_all("project", &RecordQuery::new()).await.unwrap();
        assert_eq!(all.len(), 1, "{name}");
        assert_eq!(all[0].field("title"), Some(json!("A")), "update merges: {name}");
        assert_eq!(all[0].field("n"), Some(json!(2)));
        assert_eq!(all[0].field("id"), Some(json!(id)));

        records.delete_by_id("project", id).await.unwrap();
        assert!(records.read_all("project", &RecordQuery::new()).await.unwrap().is_empty());

        let err = records.delete_by_id("project", id).await.unwrap_err();
        assert!(err.is_not_found(), "{name}");
        let err = records
            .update_by_id("project", id, fields(json!({"n": 3})))
            .await
            .unwrap_err();
        assert!(err.is_not_found(), "{name}");
    }
}

#[tokio::test]
async fn ids_are_assigned_by_the_store() {
    for (name, store) in backends().await {
        let records = store.records();
        let a = records.insert("project", Fields::new()).await.unwrap();
        let b = records.insert("project", Fields::new()).await.unwrap();
        assert!(b > a, "{name}");

        let err = records
            .insert("project", fields(json!({"id": 99})))
            .await
            .unwrap_err();
        assert!(
            matches!(err, folio::Error::Backend(ref e) if e.is_validation_error()),
            "{name}"
        );
    }
}

#[tokio::test]
async fn queries_filter_and_order_identically() {
    for (name, store) in backends().await {
        let records = store.records();
        for (slug, order, created, status) in [
            ("a", 2, "2024-01-01", "published"),
            ("b", 1, "2024-01-01", "hidden"),
            ("c", 1, "2024-03-01", "published"),
            ("d", 3, "2024-01-01", "published"),
        ] {
            records
                .insert(
                    "project",
                    fields(json!({
                        "slug": slug,
                        "display_order": order,
                        "created_at": created,
                        "status": status,
                    })),
                )
                .await
                .unwrap();
        }
        records
            .insert("project", fields(json!({"slug": "e", "status": "published"})))
            .await
            .unwrap();
        records.insert("other", fields(json!({"slug": "x"}))).await.unwrap();

        let query = RecordQuery::new()
            .filter_eq("status", "published")
            .order_by("display_order", true)
            .order_by("created_at", false);
        let slugs: Vec<_> = records
            .read_all("project", &query)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.fields["slug"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(slugs, vec!["c", "a", "d", "e"], "{name}");
    }
}

#[tokio::test]
async fn slug_is_unique_per_project_table() {
    for (name, store) in backends().await {
        let records = store.records();
        let a = records
            .insert("project", fields(json!({"slug": "same"})))
            .await
            .unwrap();
        let err = records
            .insert("project", fields(json!({"slug": "same"})))
            .await
            .unwrap_err();
        assert!(err.is_conflict(), "{name}");

        // Rewriting a record's own slug is not a conflict.
        records
            .update_by_id("project", a, fields(json!({"slug": "same", "title": "t"})))
            .await
            .unwrap();

        let b = records
            .insert("project", fields(json!({"slug": "other"})))
            .await
            .unwrap();
        let err = records
            .update_by_id("project", b, fields(json!({"slug": "same"})))
            .await
            .unwrap_err();
        assert!(err.is_conflict(), "{name}");

        // A freed slug can be taken again.
        records.delete_by_id("project", a).await.unwrap();
        records
            .update_by_id("project", b, fields(json!({"slug": "same"})))
            .await
            .unwrap();

        // Other tables are unconstrained.
        records.insert("other", fields(json!({"slug": "same"}))).await.unwrap();
        records.insert("other", fields(json!({"slug": "same"}))).await.unwrap();
    }
}

#[tokio::test]
async fn concurrent_updates_all_land() {
    for (name, store) in backends().await {
        let records = store.records();
        let mut ids = Vec::new();
        for i in 0..20 {
            ids.push(
                records
                    .insert("project", fields(json!({"slug": format!("p{i}")})))
                    .await
                    .unwrap(),
            );
        }
        let writes = ids.iter().enumerate().map(|(i, id)| {
            records.update_by_id("project", *id, fields(json!({"display_order": 20 - i})))
        });
        for result in futures::future::join_all(writes).await {
            result.unwrap();
        }

        let ordered: Vec<_> = records
            .read_all("project", &RecordQuery::new().order_by("display_order", true))
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        let expected: Vec<_> = ids.iter().rev().copied().collect();
        assert_eq!(ordered, expected, "{name}");
    }
}
