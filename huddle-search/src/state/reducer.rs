//! The pure search-state transition function.
//!
//! The lifecycle is `Idle → Searching → {Succeeded | Failed}`, with `Idle`
//! reachable again through [`SearchAction::ClearSearch`]. All effects
//! (network, history, persistence) live in the store; this function only
//! maps a state and an action to the next state.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::history::HistoryItem;
use crate::models::SearchResponse;

use super::SearchFilters;

/// Lifecycle phase of the current search cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchPhase {
    /// No search active.
    #[default]
    Idle,
    /// A search is in flight.
    Searching,
    /// The last search committed results.
    Succeeded,
    /// The last search failed with a user-visible message.
    Failed,
}

/// The aggregate search state. One instance lives per store.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    /// Current query text.
    pub query: String,
    /// Results of the last successful search, if any.
    pub results: Option<SearchResponse>,
    /// Current lifecycle phase.
    pub phase: SearchPhase,
    /// Human-readable error message when `phase` is `Failed`.
    pub error: Option<String>,
    /// Active filters.
    pub filters: SearchFilters,
    /// Search history, most recent first.
    pub history: Vec<HistoryItem>,
    /// When the last search committed.
    pub last_search_at: Option<DateTime<Utc>>,
    /// Identifier of the browsing session this state belongs to.
    pub session_id: Uuid,
}

impl SearchState {
    /// Creates a pristine idle state for a session.
    #[must_use]
    pub fn new(session_id: Uuid) -> Self {
        Self {
            query: String::new(),
            results: None,
            phase: SearchPhase::Idle,
            error: None,
            filters: SearchFilters::default(),
            history: Vec::new(),
            last_search_at: None,
            session_id,
        }
    }

    /// Whether a search is currently in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == SearchPhase::Searching
    }
}

/// Every event the reducer understands.
#[derive(Debug, Clone)]
pub enum SearchAction {
    /// The query text changed; clears any standing error.
    SetQuery(String),
    /// A search was dispatched for the given query.
    SearchStarted {
        /// The query being searched.
        query: String,
    },
    /// A search committed results.
    SearchSucceeded {
        /// The scored, filtered results.
        results: SearchResponse,
        /// Commit time.
        at: DateTime<Utc>,
    },
    /// A search failed with a displayable message.
    SearchFailed {
        /// The message shown to the user.
        message: String,
    },
    /// The filter set was replaced (post-merge).
    FiltersChanged(SearchFilters),
    /// The history list was reloaded from its store.
    HistoryReplaced(Vec<HistoryItem>),
    /// Query/results/error reset to idle. Filters and history persist.
    ClearSearch,
    /// Query and filters rehydrated from the URL or session slot.
    Restored {
        /// Restored query text.
        query: String,
        /// Restored filters.
        filters: SearchFilters,
        /// Restored session id, when the slot carried one.
        session_id: Option<Uuid>,
    },
}

/// Applies one action to a state, producing the next state.
#[must_use]
pub fn reduce(state: &SearchState, action: SearchAction) -> SearchState {
    let mut next = state.clone();
    match action {
        SearchAction::SetQuery(query) => {
            next.query = query;
            next.error = None;
        }
        SearchAction::SearchStarted { query } => {
            next.query = query;
            next.phase = SearchPhase::Searching;
            next.error = None;
        }
        SearchAction::SearchSucceeded { results, at } => {
            next.results = Some(results);
            next.phase = SearchPhase::Succeeded;
            next.error = None;
            next.last_search_at = Some(at);
        }
        SearchAction::SearchFailed { message } => {
            next.results = None;
            next.phase = SearchPhase::Failed;
            next.error = Some(message);
        }
        SearchAction::FiltersChanged(filters) => {
            next.filters = filters;
        }
        SearchAction::HistoryReplaced(history) => {
            next.history = history;
        }
        SearchAction::ClearSearch => {
            next.query = String::new();
            next.results = None;
            next.error = None;
            next.phase = SearchPhase::Idle;
        }
        SearchAction::Restored {
            query,
            filters,
            session_id,
        } => {
            next.query = query;
            next.filters = filters;
            next.error = None;
            if let Some(session_id) = session_id {
                next.session_id = session_id;
            }
        }
    }
    next
}
