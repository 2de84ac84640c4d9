//! Loading About documents of every stored shape.

use folio::{
    Clock, FixedClock,
    content::{AboutPage, ListField, ListItem, Section},
};
use serde_json::json;

#[test]
fn list_field_decodes_both_shapes() {
    let legacy: ListField = serde_json::from_value(json!("a\nb")).unwrap();
    assert_eq!(legacy, ListField::LegacyText("a\nb".into()));

    let structured: ListField = serde_json::from_value(json!([{"id": "x", "text": "A"}])).unwrap();
    assert_eq!(
        structured,
        ListField::StructuredList(vec![ListItem {
            id: "x".into(),
            text: "A".into()
        }])
    );
}

#[test]
fn migration_keeps_interior_blank_lines_and_trims() {
    let items = ListField::LegacyText("first\r\n\n  third  ".into()).migrate(42);
    let texts: Vec<_> = items.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "", "third"]);
    let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["migrated-0-42", "migrated-1-42", "migrated-2-42"]);
}

#[test]
fn structured_lists_are_not_migrated() {
    let items = vec![ListItem {
        id: "keep".into(),
        text: "as is".into(),
    }];
    assert_eq!(ListField::StructuredList(items.clone()).migrate(1), items);
}

#[test]
fn mixed_document_loads_every_section() {
    let clock = FixedClock::new(9000);
    let _hold = clock.hold();
    let doc = json!({
        "imageUrl": "/uploads/studio.png",
        "experience": [{"id": "e1", "text": "2019"}],
        "services": "Identity\nPackaging",
        "clients": null,
        "unknownKey": true,
    });
    let page = AboutPage::from_document(Some(doc), &clock).unwrap();

    assert_eq!(page.image_url, "/uploads/studio.png");
    assert_eq!(page.list(Section::Experience).len(), 1);
    assert_eq!(page.list(Section::Services)[1].text, "Packaging");
    assert_eq!(
        page.list(Section::Services)[0].id.as_str(),
        format!("migrated-0-{}", clock.now_millis())
    );
    assert!(page.list(Section::Clients).is_empty());
}

#[test]
fn saved_page_reloads_unchanged() {
    let clock = FixedClock::default();
    let mut page = AboutPage::default();
    page.description = "Hello".into();
    page.clients = vec![ListItem {
        id: "c".into(),
        text: "Acme".into(),
    }];
    let stored = serde_json::to_value(&page).unwrap();
    assert_eq!(AboutPage::from_document(Some(stored), &clock).unwrap(), page);
}

#[test]
fn non_object_documents_are_rejected() {
    let clock = FixedClock::default();
    assert!(AboutPage::from_document(Some(json!(12)), &clock).is_err());
    assert!(AboutPage::from_document(Some(json!([1])), &clock).is_err());
}
