use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::ContentError;
use crate::{
    backend::{Fields, Record, RecordId},
    clock::{Clock, SystemClock},
    ordering::{ItemId, OrderedItem},
    session::{DirtyTracking, EditSession},
};

/// Prefix of generated detail image ids.
const IMAGE_ID_PREFIX: &str = "img";

/// Publication state of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    /// Prepared but not shown
    #[default]
    Ready,
    Published,
    Hidden,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Ready => "ready",
            ProjectStatus::Published => "published",
            ProjectStatus::Hidden => "hidden",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ready" => Ok(ProjectStatus::Ready),
            "published" => Ok(ProjectStatus::Published),
            "hidden" => Ok(ProjectStatus::Hidden),
            _ => Err(ContentError::UnknownName {
                kind: "status",
                name: s.to_string(),
            }),
        }
    }
}

/// An image on a project's detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailImage {
    pub id: ItemId,
    pub url: String,
}

/// The free-form detail content of a project.
///
/// Stored as one JSON value in the record's `contents` field. Missing keys
/// read as their defaults, so older records keep loading as fields are
/// added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectContent {
    pub project: String,
    pub year: i32,
    pub client: String,
    pub services: String,
    pub product: String,
    pub keyword: Vec<String>,
    pub challenge: String,
    pub thumbnail43: String,
    pub thumbnail34: String,
    pub detail_images: Vec<DetailImage>,
}

impl Default for ProjectContent {
    fn default() -> Self {
        Self::new(&SystemClock)
    }
}

impl ProjectContent {
    /// Empty content dated to the clock's current year.
    pub fn new(clock: &dyn Clock) -> Self {
        Self {
            project: String::new(),
            year: clock.current_year(),
            client: String::new(),
            services: String::new(),
            product: String::new(),
            keyword: Vec::new(),
            challenge: String::new(),
            thumbnail43: String::new(),
            thumbnail34: String::new(),
            detail_images: Vec::new(),
        }
    }

    /// An editing session over the detail images.
    ///
    /// Payloads are image URLs; images added through the session get ids of
    /// the form `img-<millis>-<seq>`. Write the result back with
    /// [`ProjectContent::set_images`].
    pub fn image_list(&self, clock: Arc<dyn Clock>) -> EditSession<String> {
        let mut session =
            EditSession::with_clock(DirtyTracking::Structural, IMAGE_ID_PREFIX, clock);
        session.load(
            self.detail_images
                .iter()
                .map(|image| OrderedItem::new(image.id.clone(), image.url.clone()))
                .collect(),
        );
        session
    }

    /// Replaces the detail images with the live order of `session`.
    pub fn set_images(&mut self, session: &EditSession<String>) {
        self.detail_images = session
            .items()
            .iter()
            .map(|item| DetailImage {
                id: item.id.clone(),
                url: item.payload.clone(),
            })
            .collect();
    }
}

/// Splits comma separated keywords, dropping empty entries.
pub fn parse_keywords(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_string)
        .collect()
}

/// Checks that `slug` can be used in a URL path unchanged.
///
/// Allowed: ASCII letters and digits plus `-`, `_`, `.` and `~`.
pub fn validate_slug(slug: &str) -> Result<(), ContentError> {
    let valid = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'));
    if valid {
        Ok(())
    } else {
        Err(ContentError::InvalidSlug {
            slug: slug.to_string(),
        })
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A project record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: RecordId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ProjectStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_order: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contents: ProjectContent,
}

impl Project {
    /// Decodes a stored record.
    pub fn from_record(record: Record) -> Result<Self, ContentError> {
        let id = record.id;
        serde_json::to_value(&record)
            .and_then(serde_json::from_value)
            .map_err(|source| ContentError::InvalidRecord { id, source })
    }

    /// The id a project carries inside an editing session.
    pub fn item_id(&self) -> ItemId {
        ItemId::new(self.id.to_string())
    }

    /// Wraps the project for an editing session.
    pub fn into_item(self) -> OrderedItem<Project> {
        OrderedItem::new(self.item_id(), self)
    }

    pub fn is_published(&self) -> bool {
        self.status == ProjectStatus::Published
    }
}

/// The editable fields of a project, as entered in the admin form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub status: ProjectStatus,
    pub contents: ProjectContent,
}

impl ProjectDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            slug: slug.into(),
            status: ProjectStatus::default(),
            contents: ProjectContent::default(),
        }
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_contents(mut self, contents: ProjectContent) -> Self {
        self.contents = contents;
        self
    }

    /// A draft prefilled from an existing project.
    pub fn from_project(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            slug: project.slug.clone(),
            status: project.status,
            contents: project.contents.clone(),
        }
    }

    /// Title, description and slug are required; the slug must be URL safe.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.title.trim().is_empty() {
            return Err(ContentError::MissingField { field: "title" });
        }
        if self.description.trim().is_empty() {
            return Err(ContentError::MissingField {
                field: "description",
            });
        }
        if self.slug.is_empty() {
            return Err(ContentError::MissingField { field: "slug" });
        }
        validate_slug(&self.slug)
    }

    /// The record fields this draft writes.
    pub fn to_fields(&self) -> Result<Fields, ContentError> {
        let contents = serde_json::to_value(&self.contents)
            .map_err(|source| ContentError::SerializationFailed { source })?;
        let mut fields = Fields::new();
        fields.insert("title".into(), Value::from(self.title.as_str()));
        fields.insert("description".into(), Value::from(self.description.as_str()));
        fields.insert("slug".into(), Value::from(self.slug.as_str()));
        fields.insert("status".into(), Value::from(self.status.as_str()));
        fields.insert("contents".into(), contents);
        Ok(fields)
    }
}
