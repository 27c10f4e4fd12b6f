//! Debounced dropdown search previews.
//!
//! Turns keystroke-level query changes into throttled calls against the
//! search service and publishes a capped per-domain preview through a
//! `tokio::sync::watch` channel. The dropdown owns its own request stream,
//! so preview cancellation never interferes with explicit submits. A
//! cancelled preview fetch is a pure no-op: previously published results
//! stay on screen and no error is ever shown while the user types.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::cancellation::RequestStream;
use crate::config::DropdownConfig;
use crate::debounce::Debouncer;
use crate::errors::SearchError;
use crate::models::SearchResponse;
use crate::service::SearchService;

/// Published preview state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DropdownState {
    /// Truncated per-domain results; `None` until a preview has run.
    pub results: Option<SearchResponse>,
    /// Whether the dropdown panel is open.
    pub open: bool,
}

struct Inner {
    service: Arc<SearchService>,
    config: DropdownConfig,
    debouncer: Debouncer,
    stream: RequestStream,
    tx: watch::Sender<DropdownState>,
}

impl Inner {
    async fn run_preview(&self, query: String) {
        match self.service.search_all_on(&self.stream, &query, true).await {
            Ok(response) => {
                let preview = response.truncated(self.config.max_per_domain);
                let has_results = !preview.is_empty();
                self.tx.send_modify(|state| {
                    state.results = Some(preview);
                    if has_results {
                        state.open = true;
                    }
                });
            }
            // Superseded previews change nothing the user can see.
            Err(SearchError::Cancelled) => {}
            Err(err) => {
                debug!(query, error = %err, "dropdown preview failed");
                self.tx.send_replace(DropdownState {
                    results: Some(SearchResponse::empty()),
                    open: false,
                });
            }
        }
    }
}

/// Debounced search-preview driver. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct DropdownSearch {
    inner: Arc<Inner>,
}

impl DropdownSearch {
    /// Creates a dropdown driver over the given service.
    #[must_use]
    pub fn new(service: Arc<SearchService>, config: DropdownConfig) -> Self {
        let (tx, _) = watch::channel(DropdownState::default());
        let debouncer = Debouncer::new(config.debounce());
        Self {
            inner: Arc::new(Inner {
                service,
                config,
                debouncer,
                stream: RequestStream::new("dropdown"),
                tx,
            }),
        }
    }

    /// Subscribes to preview state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DropdownState> {
        self.inner.tx.subscribe()
    }

    /// Current preview state snapshot.
    #[must_use]
    pub fn state(&self) -> DropdownState {
        self.inner.tx.borrow().clone()
    }

    /// Feeds one keystroke-level query change into the debouncer.
    ///
    /// Below the minimum length this immediately clears and closes the
    /// preview without touching the network; otherwise the debounce window
    /// restarts and only the value present when it fires is searched.
    pub fn on_query_change(&self, raw: &str) {
        let trimmed = raw.trim();
        if trimmed.chars().count() < self.inner.config.min_query_len {
            self.inner.debouncer.cancel();
            self.inner.stream.cancel_current();
            self.inner.tx.send_replace(DropdownState::default());
            return;
        }

        let query = trimmed.to_string();
        let inner = self.inner.clone();
        self.inner.debouncer.schedule(move || async move {
            inner.run_preview(query).await;
        });
    }

    /// Closes the panel without discarding published results.
    pub fn close(&self) {
        self.inner.tx.send_modify(|state| state.open = false);
    }

    /// Cancels pending and in-flight preview work (e.g. on unmount).
    pub fn shutdown(&self) {
        self.inner.debouncer.cancel();
        self.inner.stream.cancel_current();
    }
}

impl std::fmt::Debug for DropdownSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropdownSearch")
            .field("config", &self.inner.config)
            .finish()
    }
}
