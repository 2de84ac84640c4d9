use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    Result,
    backend::DocumentStore,
    clock::{Clock, SystemClock},
    constants::ABOUT_KEY,
    content::{AboutField, AboutPage, ListItem, Section},
    ordering::{ItemId, OrderedItem, OrderingError},
    session::{DirtyTracking, EditSession},
    sync::DocumentSync,
};

/// Prefix of ids given to items added in the editor.
const ITEM_ID_PREFIX: &str = "item";

/// Editor for the About page document.
///
/// The three lists are each an [`EditSession`] with structural dirty
/// tracking; the plain text fields are compared against the last saved
/// page. Saving writes the whole page as one document.
pub struct AboutEditor {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    current: AboutPage,
    saved: AboutPage,
    experience: EditSession<String>,
    services: EditSession<String>,
    clients: EditSession<String>,
}

impl AboutEditor {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        let session =
            || EditSession::with_clock(DirtyTracking::Structural, ITEM_ID_PREFIX, clock.clone());
        Self {
            experience: session(),
            services: session(),
            clients: session(),
            store,
            current: AboutPage::default(),
            saved: AboutPage::default(),
            clock,
        }
    }

    /// Reads the page from the store, migrating legacy list text.
    ///
    /// A missing document loads the defaults.
    pub async fn load(&mut self) -> Result<()> {
        let document = DocumentSync::new(self.store.as_ref(), ABOUT_KEY).load().await?;
        let page = AboutPage::from_document(document, self.clock.as_ref())?;
        self.load_page(page);
        Ok(())
    }

    /// Starts editing `page` as if it had just been read from the store.
    pub fn load_page(&mut self, page: AboutPage) {
        for section in Section::ALL {
            let items = page
                .list(section)
                .iter()
                .cloned()
                .map(OrderedItem::from)
                .collect();
            self.session_mut(section).load(items);
        }
        self.saved = page.clone();
        self.current = page;
    }

    /// The page as currently edited.
    pub fn page(&self) -> AboutPage {
        let mut page = self.current.clone();
        for section in Section::ALL {
            *page.list_mut(section) = self
                .session(section)
                .items()
                .iter()
                .cloned()
                .map(ListItem::from)
                .collect();
        }
        page
    }

    pub fn field(&self, field: AboutField) -> &str {
        self.current.field(field)
    }

    pub fn set_field(&mut self, field: AboutField, value: impl Into<String>) {
        *self.current.field_mut(field) = value.into();
        debug!(%field, "Edited About field");
    }

    pub fn items(&self, section: Section) -> &[OrderedItem<String>] {
        self.session(section).items()
    }

    /// Appends an item to `section` and returns its new id.
    pub fn add_item(&mut self, section: Section, text: impl Into<String>) -> ItemId {
        self.session_mut(section).insert(text.into())
    }

    /// Replaces the text of `id`. Returns `false` if `section` has no such item.
    pub fn edit_item(&mut self, section: Section, id: &ItemId, text: impl Into<String>) -> bool {
        self.session_mut(section).apply_edit(id, text.into())
    }

    /// Removes `id`. Returns `false` if `section` has no such item.
    pub fn remove_item(&mut self, section: Section, id: &ItemId) -> bool {
        self.session_mut(section).remove(id)
    }

    pub fn move_item(
        &mut self,
        section: Section,
        from: usize,
        to: usize,
    ) -> std::result::Result<(), OrderingError> {
        self.session_mut(section).apply_move(from, to)
    }

    /// Whether the page differs from the last loaded or saved version.
    pub fn is_dirty(&self) -> bool {
        Section::ALL
            .iter()
            .any(|section| self.session(*section).is_dirty())
            || AboutField::ALL
                .iter()
                .any(|field| self.current.field(*field) != self.saved.field(*field))
    }

    /// Writes the whole page as one document.
    ///
    /// On failure nothing changes locally: the editor stays dirty and the
    /// save can be retried.
    pub async fn save(&mut self) -> Result<()> {
        let page = self.page();
        DocumentSync::new(self.store.as_ref(), ABOUT_KEY)
            .save(&page)
            .await?;

        for section in Section::ALL {
            self.session_mut(section).mark_synced();
        }
        self.saved = page;
        info!("Saved About page");
        Ok(())
    }

    /// Drops unsaved edits, returning to the last loaded or saved page.
    pub fn discard(&mut self) {
        let saved = self.saved.clone();
        self.load_page(saved);
    }

    fn session(&self, section: Section) -> &EditSession<String> {
        match section {
            Section::Experience => &self.experience,
            Section::Services => &self.services,
            Section::Clients => &self.clients,
        }
    }

    fn session_mut(&mut self, section: Section) -> &mut EditSession<String> {
        match section {
            Section::Experience => &mut self.experience,
            Section::Services => &mut self.services,
            Section::Clients => &mut self.clients,
        }
    }
}
