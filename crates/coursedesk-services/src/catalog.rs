//! Catalog view controller
//!
//! Owns the authoritative in-memory topic list for one view. All mutations
//! are keyed by topic id, never by position, so store responses can arrive
//! in any order relative to each other:
//!
//! - a delete that completes after a refresh prunes its id from whatever the
//!   list holds at that moment;
//! - a refresh that was started before a delete or an upload completed has
//!   that local change re-applied to its (older) result;
//! - an older refresh never overwrites the result of a newer one.
//!
//! Once the controller is unmounted every late continuation is dropped.

use crate::confirm::Confirm;
use crate::upload::UploadObserver;
use coursedesk_core::{query, ErrorMetadata, StoreError, StoreResult, TopicId, TopicRecord};
use coursedesk_storage::TopicStore;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

/// Operation a banner reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOperation {
    Load,
    Delete,
}

impl fmt::Display for CatalogOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogOperation::Load => write!(f, "Failed to load topics"),
            CatalogOperation::Delete => write!(f, "Failed to delete topic"),
        }
    }
}

/// Dismissible error notice shown above the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub operation: CatalogOperation,
    pub error: StoreError,
}

impl Banner {
    pub fn message(&self) -> String {
        format!("{}: {}", self.operation, self.error.client_message())
    }

    pub fn suggested_action(&self) -> Option<&'static str> {
        self.error.suggested_action()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The list was replaced with this many topics.
    Loaded(usize),
    /// A newer refresh had already been applied; this result was dropped.
    Superseded,
    Detached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined; the store was not contacted.
    Declined,
    Removed,
    Detached,
}

#[derive(Debug, Default)]
struct CatalogState {
    topics: Vec<TopicRecord>,
    banner: Option<Banner>,
    seq: u64,
    in_flight: Vec<u64>,
    applied: u64,
    deleted: Vec<(u64, TopicId)>,
    created: Vec<(u64, TopicRecord)>,
}

impl CatalogState {
    fn begin_refresh(&mut self) -> u64 {
        self.seq += 1;
        self.in_flight.push(self.seq);
        self.seq
    }

    /// Apply a list result fetched by the refresh started at `started`.
    fn finish_refresh(&mut self, started: u64, fetched: Vec<TopicRecord>) -> LoadOutcome {
        self.in_flight.retain(|s| *s != started);

        let outcome = if started < self.applied {
            LoadOutcome::Superseded
        } else {
            let mut topics = fetched;
            for (_, record) in self.created.iter().filter(|(s, _)| *s > started) {
                if !topics.iter().any(|t| t.id == record.id) {
                    topics.push(record.clone());
                }
            }
            for (_, id) in self.deleted.iter().filter(|(s, _)| *s > started) {
                topics.retain(|t| &t.id != id);
            }
            self.topics = topics;
            self.applied = started;
            LoadOutcome::Loaded(self.topics.len())
        };

        self.prune_log();
        outcome
    }

    fn abandon_refresh(&mut self, started: u64) {
        self.in_flight.retain(|s| *s != started);
        self.prune_log();
    }

    /// Drop log entries no in-flight refresh can still need.
    fn prune_log(&mut self) {
        match self.in_flight.iter().min().copied() {
            Some(oldest) => {
                self.deleted.retain(|(s, _)| *s > oldest);
                self.created.retain(|(s, _)| *s > oldest);
            }
            None => {
                self.deleted.clear();
                self.created.clear();
            }
        }
    }

    fn remove(&mut self, id: &TopicId) -> bool {
        let before = self.topics.len();
        self.topics.retain(|t| &t.id != id);
        if !self.in_flight.is_empty() {
            self.seq += 1;
            self.deleted.push((self.seq, id.clone()));
        }
        self.topics.len() != before
    }

    fn append_if_absent(&mut self, record: TopicRecord) -> bool {
        if self.topics.iter().any(|t| t.id == record.id) {
            return false;
        }
        if !self.in_flight.is_empty() {
            self.seq += 1;
            self.created.push((self.seq, record.clone()));
        }
        self.topics.push(record);
        true
    }
}

/// Handle to one catalog view. Clones share state.
#[derive(Clone)]
pub struct CatalogController {
    store: Arc<dyn TopicStore>,
    confirm: Arc<dyn Confirm>,
    state: Arc<Mutex<CatalogState>>,
    mounted: CancellationToken,
}

impl CatalogController {
    pub fn new(store: Arc<dyn TopicStore>, confirm: Arc<dyn Confirm>) -> Self {
        CatalogController {
            store,
            confirm,
            state: Arc::new(Mutex::new(CatalogState::default())),
            mounted: CancellationToken::new(),
        }
    }

    /// Initial fetch when the view is shown.
    pub async fn load(&self) -> StoreResult<LoadOutcome> {
        tracing::debug!("Loading catalog");
        self.refresh().await
    }

    /// Replace the list with the store's current catalog.
    ///
    /// On failure the list is left as it was and a banner is raised.
    pub async fn refresh(&self) -> StoreResult<LoadOutcome> {
        if self.is_unmounted() {
            return Ok(LoadOutcome::Detached);
        }
        let started = self.lock().begin_refresh();

        let result = self.store.list().await;

        if self.is_unmounted() {
            tracing::debug!("Catalog fetch finished after unmount");
            return Ok(LoadOutcome::Detached);
        }

        let mut state = self.lock();
        match result {
            Ok(topics) => {
                let outcome = state.finish_refresh(started, topics);
                if let LoadOutcome::Loaded(count) = outcome {
                    if matches!(&state.banner, Some(b) if b.operation == CatalogOperation::Load) {
                        state.banner = None;
                    }
                    tracing::info!(count, "Catalog loaded");
                }
                Ok(outcome)
            }
            Err(e) => {
                state.abandon_refresh(started);
                tracing::warn!(error = %e, "Failed to load catalog");
                state.banner = Some(Banner {
                    operation: CatalogOperation::Load,
                    error: e.clone(),
                });
                Err(e)
            }
        }
    }

    /// Ask for confirmation, then delete the topic from the store and from
    /// the list.
    ///
    /// The id does not have to be in the list; removal is by id against
    /// whatever the list holds when the store responds.
    pub async fn request_delete(&self, id: &TopicId) -> StoreResult<DeleteOutcome> {
        if self.is_unmounted() {
            return Ok(DeleteOutcome::Detached);
        }

        let title = self.find(id).map(|t| t.title);
        let message = match &title {
            Some(title) => format!("Delete topic \"{}\"?", title),
            None => "Delete this topic?".to_string(),
        };
        if !self.confirm.confirm(&message) {
            tracing::debug!(topic_id = %id, "Delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        let result = self.store.remove(id).await;

        if self.is_unmounted() {
            tracing::debug!(topic_id = %id, "Delete finished after unmount");
            return Ok(DeleteOutcome::Detached);
        }

        let mut state = self.lock();
        match result {
            Ok(()) => {
                let was_listed = state.remove(id);
                tracing::info!(topic_id = %id, was_listed, "Topic removed from catalog");
                Ok(DeleteOutcome::Removed)
            }
            Err(e) => {
                tracing::warn!(topic_id = %id, error = %e, "Failed to delete topic");
                state.banner = Some(Banner {
                    operation: CatalogOperation::Delete,
                    error: e.clone(),
                });
                Err(e)
            }
        }
    }

    /// Add a freshly created record unless one with the same id is already
    /// listed. Returns whether the list changed.
    pub fn apply_created(&self, record: TopicRecord) -> bool {
        if self.is_unmounted() {
            return false;
        }
        let id = record.id.clone();
        let appended = self.lock().append_if_absent(record);
        tracing::debug!(topic_id = %id, appended, "Applied created topic");
        appended
    }

    /// Snapshot of the full list in display order.
    pub fn topics(&self) -> Vec<TopicRecord> {
        self.lock().topics.clone()
    }

    /// Topics whose title contains `search_term`, case-insensitively.
    pub fn visible(&self, search_term: &str) -> Vec<TopicRecord> {
        query::filter(&self.lock().topics, search_term)
    }

    pub fn find(&self, id: &TopicId) -> Option<TopicRecord> {
        self.lock().topics.iter().find(|t| &t.id == id).cloned()
    }

    pub fn banner(&self) -> Option<Banner> {
        self.lock().banner.clone()
    }

    pub fn dismiss_banner(&self) {
        self.lock().banner = None;
    }

    /// Tear the view down. Pending store calls still complete but no longer
    /// touch the list or the banner.
    pub fn unmount(&self) {
        self.mounted.cancel();
    }

    pub fn is_unmounted(&self) -> bool {
        self.mounted.is_cancelled()
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl UploadObserver for CatalogController {
    fn topic_created(&self, record: &TopicRecord) {
        self.apply_created(record.clone());
    }
}
