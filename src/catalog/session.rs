//! Session state for the saved query list.
//!
//! Holds the loaded catalog, the user's criteria and the record in focus, and keeps the
//! selection consistent as the catalog and criteria change. No I/O happens here: deletes are
//! handed back to the caller as [`DeleteIntent`]s and their outcome reported through
//! [`CatalogSession::resolve_delete`].

use std::collections::HashMap;

use serde::Serialize;

use super::facets::{self, Facets};
use super::filter;
use super::selection::{Selection, SelectionEvent};
use crate::models::{
    CatalogSettings, ConnectionRecord, CriterionChange, FilterCriteria, QueryPreview, QueryRecord,
};

/// Request for the store to delete a saved query. The token ties the store's answer back to
/// this particular removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteIntent {
    pub id: String,
    pub token: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Failed(String),
}

/// Something the UI should surface to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Notification {
    DeleteFailed { id: String, message: String },
}

/// A record removed locally whose delete has not been confirmed yet
#[derive(Debug, Clone)]
struct PendingRemoval {
    record: QueryRecord,
    /// Position of the record in the loaded snapshot
    ordinal: usize,
}

#[derive(Debug, Default)]
pub struct CatalogSession {
    settings: CatalogSettings,
    catalog: Vec<QueryRecord>,
    /// Load position of every record in the current snapshot
    ordinals: HashMap<String, usize>,
    connections: Vec<ConnectionRecord>,
    facets: Facets,
    criteria: FilterCriteria,
    author_seeded: bool,
    selection: Selection,
    pending: HashMap<u64, PendingRemoval>,
    next_token: u64,
    notifications: Vec<Notification>,
}

impl CatalogSession {
    pub fn new(settings: CatalogSettings) -> Self {
        let criteria = FilterCriteria {
            sort_by: settings.default_sort_by,
            ..Default::default()
        };
        Self {
            settings,
            criteria,
            ..Default::default()
        }
    }

    /// Replace the catalog and connection list with a freshly loaded snapshot.
    ///
    /// The first load seeds the author filter with `current_identity`. Every load resets the
    /// author filter to everyone when that identity owns no query in the new snapshot, and
    /// otherwise leaves it as it was.
    pub fn load_catalog(
        &mut self,
        records: Vec<QueryRecord>,
        connections: Vec<ConnectionRecord>,
        current_identity: Option<&str>,
    ) {
        self.facets = Facets::from_catalog(&records);
        self.ordinals = records
            .iter()
            .enumerate()
            .map(|(ordinal, q)| (q.id.clone(), ordinal))
            .collect();
        self.catalog = records;
        self.connections = connections;

        if !self.author_seeded {
            self.author_seeded = true;
            if self.settings.default_to_current_user {
                self.criteria.created_by = current_identity.map(str::to_string);
            }
        }
        if facets::reconcile_author(current_identity, &self.facets.authors).is_empty() {
            self.criteria.created_by = None;
        }

        if !self.pending.is_empty() {
            log::debug!(
                "Dropping {} pending removals superseded by catalog load",
                self.pending.len()
            );
            self.pending.clear();
        }
        self.transition(SelectionEvent::Reloaded);

        log::info!(
            "Loaded {} saved queries, {} connections ({} authors, {} tags)",
            self.catalog.len(),
            self.connections.len(),
            self.facets.authors.len(),
            self.facets.tags.len()
        );
    }

    /// Update one criterion. Clears the selection unless only the sort order changed.
    pub fn set_criterion(&mut self, change: CriterionChange) {
        let field = change.field();
        self.criteria.apply(change);
        self.transition(SelectionEvent::CriterionChanged(field));
    }

    /// Remove a record locally and return the delete the store should perform.
    ///
    /// Returns `None` when no record has that id.
    pub fn delete_record(&mut self, id: &str) -> Option<DeleteIntent> {
        let index = self.catalog.iter().position(|q| q.id == id)?;
        let record = self.catalog.remove(index);
        let ordinal = self.ordinals.get(id).copied().unwrap_or(index);

        self.next_token += 1;
        let token = self.next_token;
        self.pending.insert(token, PendingRemoval { record, ordinal });
        self.transition(SelectionEvent::Deleted(id.to_string()));

        log::debug!("Removed saved query {} pending delete #{}", id, token);
        Some(DeleteIntent {
            id: id.to_string(),
            token,
        })
    }

    /// Apply the store's answer to an earlier [`DeleteIntent`]
    pub fn resolve_delete(&mut self, intent: &DeleteIntent, outcome: DeleteOutcome) {
        let pending = self.pending.remove(&intent.token);
        let message = match outcome {
            DeleteOutcome::Deleted => return,
            DeleteOutcome::Failed(message) => message,
        };

        log::warn!("Failed to delete saved query {}: {}", intent.id, message);
        if self.settings.restore_on_delete_failure {
            if let Some(PendingRemoval { record, ordinal }) = pending {
                let index = self
                    .catalog
                    .iter()
                    .position(|q| self.ordinals.get(&q.id).is_some_and(|&o| o > ordinal))
                    .unwrap_or(self.catalog.len());
                self.catalog.insert(index, record);
            }
        }
        self.notifications.push(Notification::DeleteFailed {
            id: intent.id.clone(),
            message,
        });
    }

    /// Focus the hovered record. Ids outside the visible set are ignored.
    pub fn set_hovered_selection(&mut self, id: &str) {
        let visible = self
            .catalog
            .iter()
            .any(|q| q.id == id && filter::matches(q, &self.criteria));
        if visible {
            self.transition(SelectionEvent::Hovered(id.to_string()));
        }
    }

    pub fn visible_queries(&self) -> Vec<&QueryRecord> {
        filter::visible(&self.catalog, &self.criteria)
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn catalog(&self) -> &[QueryRecord] {
        &self.catalog
    }

    pub fn connections(&self) -> &[ConnectionRecord] {
        &self.connections
    }

    pub fn connection_name(&self, connection_id: &str) -> Option<&str> {
        self.connections
            .iter()
            .find(|c| c.id == connection_id)
            .map(|c| c.name.as_str())
    }

    pub fn selected(&self) -> Option<&QueryRecord> {
        let id = self.selection.id()?;
        self.catalog.iter().find(|q| q.id == id)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.is(id)
    }

    pub fn preview(&self) -> Option<QueryPreview> {
        self.selected().map(QueryPreview::from)
    }

    pub fn has_pending_removals(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn transition(&mut self, event: SelectionEvent) {
        let current = std::mem::take(&mut self.selection);
        self.selection = current.transition(event);
    }
}
