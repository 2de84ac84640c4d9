use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::{
    Result,
    backend::{Fields, RecordId, RecordQuery, RecordStore},
    clock::{Clock, SystemClock},
    constants::{CREATED_AT_FIELD, POSITION_FIELD, PROJECT_TABLE, SLUG_FIELD, UPDATED_AT_FIELD},
    content::{Project, ProjectDraft, ProjectStatus},
    session::{DirtyTracking, EditSession},
    sync::{OrderReport, OrderSync, update_fields},
};

/// Session id prefix. Loaded projects keep their record ids.
const PROJECT_ID_PREFIX: &str = "project";

/// Display order: position ascending, newest first among equal positions.
pub fn project_query() -> RecordQuery {
    RecordQuery::new()
        .order_by(POSITION_FIELD, true)
        .order_by(CREATED_AT_FIELD, false)
}

async fn read_projects(store: &dyn RecordStore, query: &RecordQuery) -> Result<Vec<Project>> {
    store
        .read_all(PROJECT_TABLE, query)
        .await?
        .into_iter()
        .map(|record| Project::from_record(record).map_err(Into::into))
        .collect()
}

/// Published projects in display order, as listed on the public site.
pub async fn published_projects(store: &dyn RecordStore) -> Result<Vec<Project>> {
    let query = project_query().filter_eq("status", ProjectStatus::Published.as_str());
    read_projects(store, &query).await
}

/// The project with `slug`, whatever its status.
pub async fn find_project_by_slug(store: &dyn RecordStore, slug: &str) -> Result<Option<Project>> {
    let query = RecordQuery::new().filter_eq(SLUG_FIELD, slug);
    Ok(read_projects(store, &query).await?.into_iter().next())
}

/// Editor for the project list.
///
/// Projects are independent records, so the board tracks dirtiness
/// stickily: a move marks it dirty until the order is saved or reloaded.
/// Single-record edits (status, create, update, delete) are written
/// immediately.
pub struct ProjectBoard {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    session: EditSession<Project>,
    needs_reload: bool,
}

impl ProjectBoard {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            session: EditSession::with_clock(
                DirtyTracking::Sticky,
                PROJECT_ID_PREFIX,
                clock.clone(),
            ),
            store,
            clock,
            needs_reload: false,
        }
    }

    /// Reads every project in display order, discarding local changes.
    pub async fn load(&mut self) -> Result<()> {
        let projects = read_projects(self.store.as_ref(), &project_query()).await?;
        info!(count = projects.len(), "Loaded projects");
        self.session
            .load(projects.into_iter().map(Project::into_item).collect());
        self.needs_reload = false;
        Ok(())
    }

    /// Projects in their current (possibly unsaved) order.
    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.session.items().iter().map(|item| &item.payload)
    }

    pub fn get(&self, id: RecordId) -> Option<&Project> {
        self.projects().find(|project| project.id == id)
    }

    pub fn len(&self) -> usize {
        self.session.len()
    }

    pub fn is_empty(&self) -> bool {
        self.session.is_empty()
    }

    /// Whether the order was changed since the last load or save.
    pub fn is_dirty(&self) -> bool {
        self.session.is_dirty()
    }

    /// Whether a save left the store in a state only a reload can show.
    pub fn needs_reload(&self) -> bool {
        self.needs_reload
    }

    /// Moves the project at `from` to `to` locally.
    pub fn move_project(&mut self, from: usize, to: usize) -> Result<()> {
        self.session.apply_move(from, to)?;
        Ok(())
    }

    /// Writes the current order as positions `1..=n`.
    ///
    /// If some writes fail the board stays dirty and [`Self::needs_reload`]
    /// turns true; the positions that were written are not undone.
    pub async fn save_order(&mut self) -> Result<OrderReport> {
        let ids: Vec<RecordId> = self.projects().map(|project| project.id).collect();
        let report = match OrderSync::new(self.store.as_ref(), PROJECT_TABLE)
            .save_order(&ids)
            .await
        {
            Ok(report) => report,
            Err(e) => {
                if e.is_partial_order() {
                    self.needs_reload = true;
                }
                return Err(e);
            }
        };

        let positioned: Vec<Project> = self
            .projects()
            .zip(1..)
            .map(|(project, position)| Project {
                display_order: position,
                ..project.clone()
            })
            .collect();
        for project in positioned {
            self.session.apply_edit(&project.item_id(), project);
        }
        self.session.mark_synced();
        Ok(report)
    }

    /// Changes the status of one project.
    ///
    /// The new status is shown immediately and written as a single record
    /// update. If the write fails the board is reloaded from the store, so
    /// the project shows whatever is actually stored, and the write error
    /// is returned. If the reload fails too, the project and the dirty flag
    /// go back to what they were before the change and
    /// [`Self::needs_reload`] turns true. Returns `Ok(false)` for an
    /// unknown id.
    pub async fn set_status(&mut self, id: RecordId, status: ProjectStatus) -> Result<bool> {
        let Some(previous) = self.get(id).cloned() else {
            return Ok(false);
        };
        let now = self.clock.now_rfc3339();
        let updated = Project {
            status,
            updated_at: Some(now.clone()),
            ..previous.clone()
        };
        let item_id = previous.item_id();
        let was_dirty = self.session.is_dirty();
        self.session.apply_edit(&item_id, updated);

        let mut fields = Fields::new();
        fields.insert("status".into(), Value::from(status.as_str()));
        fields.insert(UPDATED_AT_FIELD.into(), Value::from(now));
        match update_fields(self.store.as_ref(), PROJECT_TABLE, id, fields).await {
            Ok(()) => {
                if !was_dirty {
                    self.session.mark_synced();
                }
                Ok(true)
            }
            Err(e) => {
                if let Err(reload_err) = self.load().await {
                    warn!(id, error = %reload_err, "Reload after failed status change failed");
                    self.session.revert_edit(&item_id, previous, was_dirty);
                    self.needs_reload = true;
                }
                Err(e)
            }
        }
    }

    /// Inserts a new project at the end of the list and reloads.
    ///
    /// A duplicate slug fails with a unique violation
    /// ([`crate::Error::is_conflict`]).
    pub async fn create(&mut self, draft: &ProjectDraft) -> Result<RecordId> {
        draft.validate()?;
        let last = self
            .store
            .read_all(PROJECT_TABLE, &RecordQuery::new())
            .await?
            .iter()
            .filter_map(|record| record.field(POSITION_FIELD).and_then(|v| v.as_i64()))
            .max()
            .unwrap_or(0);

        let mut fields = draft.to_fields()?;
        fields.insert(POSITION_FIELD.into(), Value::from(last + 1));
        fields.insert(CREATED_AT_FIELD.into(), Value::from(self.clock.now_rfc3339()));
        let id = self.store.insert(PROJECT_TABLE, fields).await?;
        info!(id, slug = %draft.slug, "Created project");

        self.load().await?;
        Ok(id)
    }

    /// Overwrites the editable fields of `id` and reloads.
    ///
    /// Returns `Ok(false)` if the project does not exist.
    pub async fn update(&mut self, id: RecordId, draft: &ProjectDraft) -> Result<bool> {
        draft.validate()?;
        let mut fields = draft.to_fields()?;
        fields.insert(UPDATED_AT_FIELD.into(), Value::from(self.clock.now_rfc3339()));
        match self.store.update_by_id(PROJECT_TABLE, id, fields).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => return Ok(false),
            Err(e) => return Err(e),
        }
        info!(id, "Updated project");
        self.load().await?;
        Ok(true)
    }

    /// Deletes `id` and reloads. Returns `Ok(false)` if it did not exist.
    pub async fn delete(&mut self, id: RecordId) -> Result<bool> {
        match self.store.delete_by_id(PROJECT_TABLE, id).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => return Ok(false),
            Err(e) => return Err(e),
        }
        info!(id, "Deleted project");
        self.load().await?;
        Ok(true)
    }
}
