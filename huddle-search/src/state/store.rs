//! The effectful search state store.
//!
//! Wraps the pure reducer with everything that touches the outside world:
//! the search service, the history store, and the session-scoped
//! persistence slot. Consumers drive it through imperative actions and read
//! immutable state snapshots.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::clock::Clock;
use crate::history::HistoryStore;
use crate::models::SearchResponse;
use crate::service::SearchService;
use crate::storage::KeyValueStore;

use super::reducer::{reduce, SearchAction, SearchState};
use super::url;
use super::FilterUpdate;

/// Default storage key for the session slot.
pub const DEFAULT_SESSION_KEY: &str = "huddle.search.session";

/// What the session slot remembers between navigations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionSnapshot {
    query: String,
    filters: super::SearchFilters,
    timestamp: DateTime<Utc>,
    session_id: Uuid,
}

/// Session-scoped persistence slot for in-flight search state.
///
/// Unlike history, this slot is scoped to the browsing session rather than
/// the profile; corrupt data reads as absent.
pub struct SessionSlot {
    storage: Arc<dyn KeyValueStore>,
    key: String,
}

impl SessionSlot {
    /// Creates a slot over `storage` with the default key.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            key: DEFAULT_SESSION_KEY.to_string(),
        }
    }

    /// Overrides the storage key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    fn load(&self) -> Option<SessionSnapshot> {
        match self.storage.get(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(snapshot) => Some(snapshot),
                Err(err) => {
                    warn!(key = %self.key, error = %err, "discarding corrupt session slot");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(key = %self.key, error = %err, "session slot read failed");
                None
            }
        }
    }

    fn save(&self, snapshot: &SessionSnapshot) {
        let serialized = match serde_json::to_string(snapshot) {
            Ok(serialized) => serialized,
            Err(err) => {
                warn!(key = %self.key, error = %err, "session snapshot serialization failed");
                return;
            }
        };
        if let Err(err) = self.storage.set(&self.key, &serialized) {
            warn!(key = %self.key, error = %err, "session slot write failed");
        }
    }
}

/// Reducer-driven store orchestrating query text, filters, lifecycle state,
/// and history, with session persistence after every relevant change.
pub struct SearchStateStore {
    state: RwLock<SearchState>,
    service: Arc<SearchService>,
    history: HistoryStore,
    session: SessionSlot,
    clock: Arc<dyn Clock>,
}

impl SearchStateStore {
    /// Creates a store with a fresh session id and preloaded history.
    #[must_use]
    pub fn new(
        service: Arc<SearchService>,
        history: HistoryStore,
        session: SessionSlot,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut state = SearchState::new(Uuid::new_v4());
        state.history = history.list();
        Self {
            state: RwLock::new(state),
            service,
            history,
            session,
            clock,
        }
    }

    /// An immutable snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SearchState {
        self.state.read().clone()
    }

    fn dispatch(&self, action: SearchAction) {
        let next = {
            let current = self.state.read();
            reduce(&current, action)
        };
        *self.state.write() = next;
    }

    fn persist_session(&self) {
        let snapshot = {
            let state = self.state.read();
            SessionSnapshot {
                query: state.query.clone(),
                filters: state.filters,
                timestamp: self.clock.now(),
                session_id: state.session_id,
            }
        };
        self.session.save(&snapshot);
    }

    /// Updates the query text without any network activity.
    pub fn set_query(&self, query: &str) {
        self.dispatch(SearchAction::SetQuery(query.to_string()));
        self.persist_session();
    }

    /// Runs a search for `query`, committing the outcome to state.
    ///
    /// Blank queries are ignored. A superseded search commits nothing; any
    /// other failure transitions to `Failed` with a displayable message.
    pub async fn perform_search(&self, query: &str, save_to_history: bool) {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return;
        }

        self.dispatch(SearchAction::SearchStarted {
            query: trimmed.to_string(),
        });
        self.persist_session();

        let filters = self.state.read().filters;
        let outcome = match filters.domain.as_domain() {
            None => self.service.search_all(trimmed, true).await,
            Some(domain) => self
                .service
                .search_by_type(trimmed, domain, true)
                .await
                .map(|results| SearchResponse::from_domain(domain, results)),
        };

        match outcome {
            Ok(response) => {
                let now = self.clock.now();
                let response = filters.apply(response, now);
                if save_to_history {
                    self.history.add(trimmed, response.total_results);
                    self.dispatch(SearchAction::HistoryReplaced(self.history.list()));
                }
                self.dispatch(SearchAction::SearchSucceeded {
                    results: response,
                    at: now,
                });
            }
            Err(err) if err.is_cancelled() => {
                // A newer search owns the state now.
            }
            Err(err) => {
                self.dispatch(SearchAction::SearchFailed {
                    message: err.user_message(),
                });
            }
        }
    }

    /// Merges a filter change and re-runs the current query.
    ///
    /// Filter-driven re-searches never pollute history.
    pub async fn perform_filtered_search(&self, update: FilterUpdate) {
        let merged = self.state.read().filters.merged(update);
        self.dispatch(SearchAction::FiltersChanged(merged));
        self.persist_session();

        let query = self.state.read().query.clone();
        if !query.trim().is_empty() {
            self.perform_search(&query, false).await;
        }
    }

    /// Resets query, results, and error back to idle.
    ///
    /// The in-flight request, if any, is cancelled through the service's
    /// own cancellation discipline; filters and history persist.
    pub fn clear_search(&self) {
        self.service.cancel_in_flight();
        self.dispatch(SearchAction::ClearSearch);
        self.persist_session();
    }

    /// Rehydrates query and filters from a shared URL query string.
    ///
    /// Runs a non-history search when the restored query is non-blank.
    pub async fn restore_from_url(&self, query_string: &str) {
        let (query, filters) = url::decode(query_string);
        self.dispatch(SearchAction::Restored {
            query: query.clone(),
            filters,
            session_id: None,
        });
        self.persist_session();

        if !query.trim().is_empty() {
            self.perform_search(&query, false).await;
        }
    }

    /// Rehydrates query, filters, and session id from the session slot.
    ///
    /// Call once on mount, before the first user-visible action. Missing or
    /// corrupt slots leave the pristine state untouched; a restored
    /// non-blank query triggers a non-history search.
    pub async fn restore_session(&self) {
        let Some(snapshot) = self.session.load() else {
            return;
        };
        self.dispatch(SearchAction::Restored {
            query: snapshot.query.clone(),
            filters: snapshot.filters,
            session_id: Some(snapshot.session_id),
        });
        self.persist_session();

        if !snapshot.query.trim().is_empty() {
            self.perform_search(&snapshot.query, false).await;
        }
    }

    /// Encodes the current query and filters as a shareable URL query
    /// string. One-way export; defaults are omitted.
    #[must_use]
    pub fn share_url(&self) -> String {
        let state = self.state.read();
        url::encode(&state.query, &state.filters)
    }

    /// Removes one history entry.
    pub fn remove_history_item(&self, id: Uuid) {
        if self.history.remove(id) {
            self.dispatch(SearchAction::HistoryReplaced(self.history.list()));
        }
    }

    /// Clears all history.
    pub fn clear_history(&self) {
        self.history.clear();
        self.dispatch(SearchAction::HistoryReplaced(Vec::new()));
    }
}

impl std::fmt::Debug for SearchStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchStateStore")
            .field("state", &self.state.read().phase)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SearchError;
    use crate::state::{DomainFilter, SearchPhase, SortBy};
    use crate::storage::MemoryStore;
    use crate::testing::{bulk_payload, sample_payload, ManualClock, StubBackend};
    use std::time::Duration;

    struct Harness {
        store: Arc<SearchStateStore>,
        backend: Arc<StubBackend>,
        storage: Arc<MemoryStore>,
    }

    fn harness() -> Harness {
        let backend = Arc::new(StubBackend::new());
        let clock = Arc::new(ManualClock::recent());
        let storage = Arc::new(MemoryStore::new());
        let service = Arc::new(SearchService::new(backend.clone(), clock.clone()));
        let history = HistoryStore::new(storage.clone(), clock.clone());
        let session = SessionSlot::new(storage.clone());
        let store = Arc::new(SearchStateStore::new(service, history, session, clock));
        Harness {
            store,
            backend,
            storage,
        }
    }

    #[tokio::test]
    async fn test_successful_search_commits_results_and_history() {
        let h = harness();
        h.backend.put("chess", sample_payload());

        h.store.perform_search("chess", true).await;

        let state = h.store.state();
        assert_eq!(state.phase, SearchPhase::Succeeded);
        assert!(state.results.is_some());
        assert!(state.error.is_none());
        assert!(state.last_search_at.is_some());
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].query, "chess");
    }

    #[tokio::test]
    async fn test_blank_query_is_ignored() {
        let h = harness();
        h.store.perform_search("   ", true).await;

        let state = h.store.state();
        assert_eq!(state.phase, SearchPhase::Idle);
        assert_eq!(h.backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_transitions_to_failed_with_message() {
        let h = harness();
        h.backend.fail_with(SearchError::Server(503));

        h.store.perform_search("chess", true).await;

        let state = h.store.state();
        assert_eq!(state.phase, SearchPhase::Failed);
        assert_eq!(state.error, Some(SearchError::Server(503).user_message()));
        assert!(state.results.is_none());
        // Failed searches never reach history.
        assert!(state.history.is_empty());
    }

    #[tokio::test]
    async fn test_filtered_search_does_not_pollute_history() {
        let h = harness();
        h.backend.put("chess", sample_payload());

        h.store.perform_search("chess", true).await;
        assert_eq!(h.store.state().history.len(), 1);

        h.store
            .perform_filtered_search(FilterUpdate {
                domain: Some(DomainFilter::Club),
                ..Default::default()
            })
            .await;

        let state = h.store.state();
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.filters.domain, DomainFilter::Club);
        // Single-domain filter routes through the per-domain search.
        let results = state.results.unwrap();
        assert!(results.threads.is_empty());
        assert!(!results.clubs.is_empty());
    }

    #[tokio::test]
    async fn test_clear_search_resets_to_idle() {
        let h = harness();
        h.backend.put("chess", sample_payload());
        h.store.perform_search("chess", true).await;

        h.store.clear_search();

        let state = h.store.state();
        assert_eq!(state.phase, SearchPhase::Idle);
        assert!(state.query.is_empty());
        assert!(state.results.is_none());
        assert!(state.error.is_none());
        // History survives a clear.
        assert_eq!(state.history.len(), 1);
    }

    #[tokio::test]
    async fn test_restore_from_url_searches_without_history() {
        let h = harness();
        h.backend.put("chess", sample_payload());

        h.store.restore_from_url("?q=chess&sort=recent").await;

        let state = h.store.state();
        assert_eq!(state.query, "chess");
        assert_eq!(state.filters.sort_by, SortBy::Recent);
        assert_eq!(state.phase, SearchPhase::Succeeded);
        assert!(state.history.is_empty());
    }

    #[tokio::test]
    async fn test_restore_from_url_without_query_skips_network() {
        let h = harness();
        h.store.restore_from_url("?type=club").await;

        let state = h.store.state();
        assert_eq!(state.filters.domain, DomainFilter::Club);
        assert_eq!(state.phase, SearchPhase::Idle);
        assert_eq!(h.backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_session_round_trips_between_stores() {
        let h = harness();
        h.backend.put("chess", sample_payload());
        h.store.perform_search("chess", true).await;
        let original_session = h.store.state().session_id;

        // A freshly navigated-to store over the same storage.
        let clock = Arc::new(ManualClock::recent());
        let service = Arc::new(SearchService::new(h.backend.clone(), clock.clone()));
        let history = HistoryStore::new(h.storage.clone(), clock.clone());
        let session = SessionSlot::new(h.storage.clone());
        let fresh = SearchStateStore::new(service, history, session, clock);

        // History was already durable before the restore.
        assert_eq!(fresh.state().history.len(), 1);

        fresh.restore_session().await;
        let state = fresh.state();
        assert_eq!(state.query, "chess");
        assert_eq!(state.session_id, original_session);
        assert_eq!(state.phase, SearchPhase::Succeeded);
        // The restore search stayed out of history.
        assert_eq!(state.history.len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_session_slot_is_ignored() {
        let h = harness();
        h.storage.set(DEFAULT_SESSION_KEY, "][ nonsense").unwrap();

        h.store.restore_session().await;
        let state = h.store.state();
        assert!(state.query.is_empty());
        assert_eq!(state.phase, SearchPhase::Idle);
    }

    #[tokio::test]
    async fn test_share_url_exports_current_state() {
        let h = harness();
        h.backend.put("chess", sample_payload());
        h.store.perform_search("chess", true).await;
        h.store
            .perform_filtered_search(FilterUpdate {
                sort_by: Some(SortBy::Recent),
                ..Default::default()
            })
            .await;

        assert_eq!(h.store.share_url(), "q=chess&sort=recent");
    }

    #[tokio::test]
    async fn test_history_removal_updates_state() {
        let h = harness();
        h.backend.put("chess", sample_payload());
        h.backend.put("go", sample_payload());
        h.store.perform_search("chess", true).await;
        h.store.perform_search("go", true).await;

        let id = h.store.state().history[1].id;
        h.store.remove_history_item(id);
        let state = h.store.state();
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].query, "go");

        h.store.clear_history();
        assert!(h.store.state().history.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_supersession_keeps_only_newest_results() {
        let h = harness();
        h.backend.put("alpha", bulk_payload(2));
        h.backend.put("beta", sample_payload());
        h.backend.set_latency(Duration::from_millis(100));

        let first = {
            let store = h.store.clone();
            tokio::spawn(async move { store.perform_search("alpha", true).await })
        };
        tokio::task::yield_now().await;

        h.store.perform_search("beta", true).await;
        first.await.unwrap();

        // Only the newest search's outcome is visible, regardless of
        // resolution order.
        let state = h.store.state();
        assert_eq!(state.phase, SearchPhase::Succeeded);
        assert_eq!(state.query, "beta");
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].query, "beta");
    }

    #[tokio::test]
    async fn test_set_query_persists_session() {
        let h = harness();
        h.store.set_query("dra");
        let raw = h.storage.get(DEFAULT_SESSION_KEY).unwrap().unwrap();
        assert!(raw.contains("\"dra\""));
    }
}
