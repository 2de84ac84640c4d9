//! Project records, statuses and drafts.

use folio::{
    backend::Record,
    content::{DetailImage, Project, ProjectContent, ProjectDraft, ProjectStatus},
};
use serde_json::json;

#[test]
fn status_names() {
    for status in [ProjectStatus::Ready, ProjectStatus::Published, ProjectStatus::Hidden] {
        assert_eq!(status.as_str().parse::<ProjectStatus>().unwrap(), status);
        assert_eq!(serde_json::to_value(status).unwrap(), json!(status.as_str()));
    }
    assert_eq!(ProjectStatus::default(), ProjectStatus::Ready);
    assert!("draft".parse::<ProjectStatus>().is_err());
}

#[test]
fn draft_fields_decode_back_into_a_project() {
    let mut contents = ProjectContent::default();
    contents.client = "Acme".into();
    contents.keyword = vec!["chair".into()];
    contents.detail_images = vec![DetailImage {
        id: "img-1-0".into(),
        url: "https://cdn/x.png".into(),
    }];
    let draft = ProjectDraft::new("Chair", "A chair", "chair")
        .with_status(ProjectStatus::Published)
        .with_contents(contents.clone());

    let mut fields = draft.to_fields().unwrap();
    fields.insert("display_order".into(), json!(4));
    fields.insert("created_at".into(), json!("2024-05-01T00:00:00+00:00"));
    let project = Project::from_record(Record::new(12, fields)).unwrap();

    assert_eq!(project.id, 12);
    assert_eq!(project.display_order, 4);
    assert!(project.is_published());
    assert_eq!(project.contents, contents);
    assert_eq!(ProjectDraft::from_project(&project), draft);
    assert_eq!(project.contents.detail_images[0].url, "https://cdn/x.png");
}

#[test]
fn contents_use_camel_case_keys() {
    let value = serde_json::to_value(ProjectContent::default()).unwrap();
    for key in [
        "project",
        "year",
        "client",
        "services",
        "product",
        "keyword",
        "challenge",
        "thumbnail43",
        "thumbnail34",
        "detailImages",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
}
