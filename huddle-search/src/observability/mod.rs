//! Logging setup and search lifecycle observation.

use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::errors::SearchError;

/// Initializes a `tracing` subscriber from `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// Observer of search lifecycle events.
///
/// Implementations must be cheap and non-blocking; they run inline on the
/// search path.
pub trait SearchObserver: Send + Sync {
    /// Called when a network search is dispatched.
    fn on_search_start(&self, scope: &str, query: &str);

    /// Called when a search commits results.
    fn on_search_complete(&self, scope: &str, query: &str, total_results: usize);

    /// Called when a search fails with a non-cancellation error.
    fn on_search_error(&self, scope: &str, query: &str, error: &SearchError);

    /// Called when a search is served from the response cache.
    fn on_cache_hit(&self, key: &str);
}

/// Observer that discards all events. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSearchObserver;

impl SearchObserver for NoOpSearchObserver {
    fn on_search_start(&self, _scope: &str, _query: &str) {}
    fn on_search_complete(&self, _scope: &str, _query: &str, _total_results: usize) {}
    fn on_search_error(&self, _scope: &str, _query: &str, _error: &SearchError) {}
    fn on_cache_hit(&self, _key: &str) {}
}

/// Observer that forwards events to the `tracing` framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSearchObserver;

impl SearchObserver for TracingSearchObserver {
    fn on_search_start(&self, scope: &str, query: &str) {
        debug!(scope, query, "search started");
    }

    fn on_search_complete(&self, scope: &str, query: &str, total_results: usize) {
        info!(scope, query, total_results, "search completed");
    }

    fn on_search_error(&self, scope: &str, query: &str, error: &SearchError) {
        error!(scope, query, %error, "search failed");
    }

    fn on_cache_hit(&self, key: &str) {
        debug!(key, "search served from cache");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observers_do_not_panic() {
        let noop = NoOpSearchObserver;
        noop.on_search_start("all", "q");
        noop.on_search_complete("all", "q", 3);
        noop.on_search_error("all", "q", &SearchError::RateLimited);
        noop.on_cache_hit("search_all_q");

        let logging = TracingSearchObserver;
        logging.on_search_start("club", "q");
        logging.on_search_complete("club", "q", 0);
        logging.on_search_error("club", "q", &SearchError::Server(500));
        logging.on_cache_hit("search_club_q");
    }

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }
}
