use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ContentError;
use crate::{
    clock::Clock,
    constants::{ABOUT_KEY, DEFAULT_ABOUT_IMAGE},
    ordering::{ItemId, OrderedItem},
};

/// One line of an About page list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: ItemId,
    #[serde(default)]
    pub text: String,
}

impl From<ListItem> for OrderedItem<String> {
    fn from(item: ListItem) -> Self {
        OrderedItem::new(item.id, item.text)
    }
}

impl From<OrderedItem<String>> for ListItem {
    fn from(item: OrderedItem<String>) -> Self {
        ListItem {
            id: item.id,
            text: item.payload,
        }
    }
}

/// A list field as found in a stored About document.
///
/// Older documents hold each list as one newline-separated string; newer
/// ones hold structured items. [`ListField::migrate`] turns either into
/// items, once, at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListField {
    StructuredList(Vec<ListItem>),
    LegacyText(String),
}

impl ListField {
    /// Splits legacy text into one item per line, trimming each line.
    ///
    /// Blank text yields no items. Migrated ids are
    /// `migrated-<line index>-<millis>`.
    pub fn migrate(self, millis: u64) -> Vec<ListItem> {
        match self {
            ListField::StructuredList(items) => items,
            ListField::LegacyText(text) if text.trim().is_empty() => Vec::new(),
            ListField::LegacyText(text) => text
                .split('\n')
                .enumerate()
                .map(|(index, line)| ListItem {
                    id: ItemId::new(format!("migrated-{index}-{millis}")),
                    text: line.trim().to_string(),
                })
                .collect(),
        }
    }
}

/// The three ordered lists of the About page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Experience,
    Services,
    Clients,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Experience, Section::Services, Section::Clients];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Experience => "experience",
            Section::Services => "services",
            Section::Clients => "clients",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| ContentError::UnknownName {
                kind: "section",
                name: s.to_string(),
            })
    }
}

/// The plain text fields of the About page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AboutField {
    ImageUrl,
    Description,
    Address,
    Contact,
    Social,
}

impl AboutField {
    pub const ALL: [AboutField; 5] = [
        AboutField::ImageUrl,
        AboutField::Description,
        AboutField::Address,
        AboutField::Contact,
        AboutField::Social,
    ];

    /// Key of the field in the stored document.
    pub fn as_str(&self) -> &'static str {
        match self {
            AboutField::ImageUrl => "imageUrl",
            AboutField::Description => "description",
            AboutField::Address => "address",
            AboutField::Contact => "contact",
            AboutField::Social => "social",
        }
    }
}

impl fmt::Display for AboutField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AboutField {
    type Err = ContentError;

    /// Accepts the document key (`imageUrl`) or its snake case form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('_', "").to_ascii_lowercase();
        AboutField::ALL
            .into_iter()
            .find(|field| field.as_str().to_ascii_lowercase() == normalized)
            .ok_or_else(|| ContentError::UnknownName {
                kind: "field",
                name: s.to_string(),
            })
    }
}

/// The About page, stored as one document under [`ABOUT_KEY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutPage {
    pub image_url: String,
    pub description: String,
    pub experience: Vec<ListItem>,
    pub services: Vec<ListItem>,
    pub clients: Vec<ListItem>,
    pub address: String,
    pub contact: String,
    pub social: String,
}

impl Default for AboutPage {
    fn default() -> Self {
        Self {
            image_url: DEFAULT_ABOUT_IMAGE.to_string(),
            description: String::new(),
            experience: Vec::new(),
            services: Vec::new(),
            clients: Vec::new(),
            address: String::new(),
            contact: String::new(),
            social: String::new(),
        }
    }
}

impl AboutPage {
    /// Builds the page from whatever is stored under [`ABOUT_KEY`].
    ///
    /// * no document: defaults
    /// * an object: defaults overlaid with the fields present, legacy list
    ///   text migrated to items
    /// * a string holding a JSON object: read as that object
    /// * any other string: an old plain-text page, kept as the description
    pub fn from_document(document: Option<Value>, clock: &dyn Clock) -> Result<Self, ContentError> {
        match document {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::Object(map)) => Self::from_object(map, clock),
            Some(Value::String(text)) => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(map)) => Self::from_object(map, clock),
                _ => Ok(Self {
                    description: text,
                    ..Self::default()
                }),
            },
            Some(other) => Err(invalid(format!("expected an object, got {other}"))),
        }
    }

    fn from_object(mut map: Map<String, Value>, clock: &dyn Clock) -> Result<Self, ContentError> {
        let millis = clock.now_millis();
        let mut page = Self::default();

        for field in AboutField::ALL {
            match map.remove(field.as_str()) {
                None | Some(Value::Null) => {}
                Some(Value::String(text)) => *page.field_mut(field) = text,
                Some(other) => *page.field_mut(field) = other.to_string(),
            }
        }
        for section in Section::ALL {
            let items = match map.remove(section.as_str()) {
                None | Some(Value::Null) => Vec::new(),
                Some(value) => serde_json::from_value::<ListField>(value)
                    .map_err(|e| invalid(format!("section '{section}': {e}")))?
                    .migrate(millis),
            };
            *page.list_mut(section) = items;
        }
        Ok(page)
    }

    pub fn field(&self, field: AboutField) -> &str {
        match field {
            AboutField::ImageUrl => &self.image_url,
            AboutField::Description => &self.description,
            AboutField::Address => &self.address,
            AboutField::Contact => &self.contact,
            AboutField::Social => &self.social,
        }
    }

    pub fn field_mut(&mut self, field: AboutField) -> &mut String {
        match field {
            AboutField::ImageUrl => &mut self.image_url,
            AboutField::Description => &mut self.description,
            AboutField::Address => &mut self.address,
            AboutField::Contact => &mut self.contact,
            AboutField::Social => &mut self.social,
        }
    }

    pub fn list(&self, section: Section) -> &[ListItem] {
        match section {
            Section::Experience => &self.experience,
            Section::Services => &self.services,
            Section::Clients => &self.clients,
        }
    }

    pub fn list_mut(&mut self, section: Section) -> &mut Vec<ListItem> {
        match section {
            Section::Experience => &mut self.experience,
            Section::Services => &mut self.services,
            Section::Clients => &mut self.clients,
        }
    }
}

fn invalid(reason: String) -> ContentError {
    ContentError::InvalidDocument {
        key: ABOUT_KEY.to_string(),
        reason,
    }
}
