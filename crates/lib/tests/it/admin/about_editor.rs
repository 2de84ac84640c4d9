//! The About editor against real and failing stores.

use std::sync::Arc;

use folio::{
    FixedClock,
    admin::AboutEditor,
    backend::{DocumentStore, database::InMemory},
    constants::ABOUT_KEY,
    content::{AboutField, Section},
};
use serde_json::json;

use crate::helpers::*;

fn texts(editor: &AboutEditor, section: Section) -> Vec<String> {
    editor
        .items(section)
        .iter()
        .map(|item| item.payload.clone())
        .collect()
}

#[tokio::test]
async fn failed_save_keeps_edits_and_can_be_retried() {
    let store = Arc::new(FlakyDocumentStore::new(InMemory::new()));
    let mut editor = AboutEditor::with_clock(store.clone(), Arc::new(FixedClock::default()));
    editor.load().await.unwrap();

    editor.add_item(Section::Experience, "2020 Studio A");
    editor.add_item(Section::Experience, "2022 Studio B");
    editor.move_item(Section::Experience, 1, 0).unwrap();
    editor.set_field(AboutField::Address, "Seoul");

    store.set_failing(true);
    let err = editor.save().await.unwrap_err();
    assert!(err.is_persistence_error());
    assert!(editor.is_dirty());
    assert_eq!(
        texts(&editor, Section::Experience),
        vec!["2022 Studio B", "2020 Studio A"]
    );
    assert_eq!(editor.field(AboutField::Address), "Seoul");

    store.set_failing(false);
    editor.save().await.unwrap();
    assert!(!editor.is_dirty());
    assert_eq!(store.write_count(), 2);

    let stored = store.read_one(ABOUT_KEY).await.unwrap().unwrap();
    assert_eq!(stored["address"], json!("Seoul"));
    assert_eq!(stored["experience"][0]["text"], json!("2022 Studio B"));
}

#[tokio::test]
async fn legacy_document_is_migrated_and_saved_structured() {
    let stores = test_stores().await;
    stores
        .documents
        .write_one(
            ABOUT_KEY,
            json!({"description": "Design studio", "clients": "Acme\nGlobex\nInitech"}),
        )
        .await
        .unwrap();

    let mut editor = AboutEditor::new(stores.documents.clone());
    editor.load().await.unwrap();
    assert!(!editor.is_dirty());
    assert_eq!(texts(&editor, Section::Clients), vec!["Acme", "Globex", "Initech"]);

    let globex = editor.items(Section::Clients)[1].id.clone();
    assert!(editor.edit_item(Section::Clients, &globex, "Globex Corp"));
    let acme = editor.items(Section::Clients)[0].id.clone();
    assert!(editor.remove_item(Section::Clients, &acme));
    editor.save().await.unwrap();

    let stored = stores.documents.read_one(ABOUT_KEY).await.unwrap().unwrap();
    assert_eq!(
        stored["clients"],
        json!([
            {"id": globex.as_str(), "text": "Globex Corp"},
            {"id": editor.items(Section::Clients)[1].id.as_str(), "text": "Initech"},
        ])
    );
    assert_eq!(stored["description"], json!("Design studio"));
}

#[tokio::test]
async fn reverting_an_edit_makes_the_editor_clean() {
    let stores = test_stores().await;
    let mut editor = AboutEditor::new(stores.documents.clone());
    editor.load().await.unwrap();

    let id = editor.add_item(Section::Services, "Branding");
    editor.save().await.unwrap();

    assert!(editor.edit_item(Section::Services, &id, "Web"));
    assert!(editor.is_dirty());
    assert!(editor.edit_item(Section::Services, &id, "Branding"));
    assert!(!editor.is_dirty());

    assert!(editor.move_item(Section::Services, 0, 1).is_err());
    assert!(!editor.is_dirty());
}
