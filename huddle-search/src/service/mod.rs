//! The search service: cache, cancellation, scoring, and fetch composed.
//!
//! `search_all` and `search_by_type` share one submit-scoped
//! [`RequestStream`]; logically separate consumers (the dropdown preview)
//! pass their own stream through the `_on` variants so their cancellation
//! never interferes with explicit submits.
//!
//! The service knows nothing about UI state. Its only side effects are the
//! shared response cache and the per-stream cancellation token.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{AbortHandle, Abortable};
use tracing::{debug, error, warn};

use crate::cache::{ResponseCache, DEFAULT_TTL};
use crate::cancellation::{CancelToken, RequestStream};
use crate::clock::Clock;
use crate::errors::SearchError;
use crate::models::raw::RawSearchPayload;
use crate::models::{Domain, SearchResponse, SearchResult};
use crate::observability::{NoOpSearchObserver, SearchObserver};
use crate::query::Query;
use crate::scoring::score_payload;
use crate::transport::SearchBackend;

/// Client-side search orchestrator.
pub struct SearchService {
    backend: Arc<dyn SearchBackend>,
    cache: ResponseCache,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn SearchObserver>,
    submit_stream: RequestStream,
    cache_ttl: Duration,
}

impl SearchService {
    /// Creates a service over the given backend and clock.
    #[must_use]
    pub fn new(backend: Arc<dyn SearchBackend>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            cache: ResponseCache::new(clock.clone()),
            clock,
            observer: Arc::new(NoOpSearchObserver),
            submit_stream: RequestStream::new("submit"),
            cache_ttl: DEFAULT_TTL,
        }
    }

    /// Overrides the cache TTL.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Installs a lifecycle observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SearchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Searches every domain on the submit stream.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::EmptyQuery`] for blank input, or any other
    /// taxonomy error translated from the fetch.
    pub async fn search_all(
        &self,
        raw_query: &str,
        use_cache: bool,
    ) -> Result<SearchResponse, SearchError> {
        self.search_all_on(&self.submit_stream, raw_query, use_cache)
            .await
    }

    /// Searches every domain on a caller-owned stream.
    ///
    /// # Errors
    ///
    /// Same contract as [`SearchService::search_all`].
    pub async fn search_all_on(
        &self,
        stream: &RequestStream,
        raw_query: &str,
        use_cache: bool,
    ) -> Result<SearchResponse, SearchError> {
        let query = Query::parse(raw_query)?;
        let key = ResponseCache::key(None, &query);

        if use_cache {
            if let Some(cached) = self.cache.get(&key) {
                self.observer.on_cache_hit(&key);
                return Ok(score_payload(&cached, &query, self.clock.now()));
            }
        }

        let raw = self.fetch_guarded(stream, "all", &query, |query| {
            let backend = self.backend.clone();
            async move { backend.fetch_all(&query).await }
        })
        .await?;

        self.cache.set(&key, raw.clone(), self.cache_ttl);
        let response = score_payload(&raw, &query, self.clock.now());
        self.observer
            .on_search_complete("all", query.as_str(), response.total_results);
        Ok(response)
    }

    /// Searches a single domain on the submit stream.
    ///
    /// # Errors
    ///
    /// Same contract as [`SearchService::search_all`].
    pub async fn search_by_type(
        &self,
        raw_query: &str,
        domain: Domain,
        use_cache: bool,
    ) -> Result<Vec<SearchResult>, SearchError> {
        self.search_by_type_on(&self.submit_stream, raw_query, domain, use_cache)
            .await
    }

    /// Searches a single domain on a caller-owned stream.
    ///
    /// # Errors
    ///
    /// Same contract as [`SearchService::search_all`].
    pub async fn search_by_type_on(
        &self,
        stream: &RequestStream,
        raw_query: &str,
        domain: Domain,
        use_cache: bool,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let query = Query::parse(raw_query)?;
        let key = ResponseCache::key(Some(domain), &query);

        if use_cache {
            if let Some(cached) = self.cache.get(&key) {
                self.observer.on_cache_hit(&key);
                let scored = score_payload(&cached, &query, self.clock.now());
                return Ok(scored.into_domain(domain));
            }
        }

        let raw = self.fetch_guarded(stream, domain.as_str(), &query, |query| {
            let backend = self.backend.clone();
            async move { backend.fetch_domain(domain, &query).await }
        })
        .await?;

        self.cache.set(&key, raw.clone(), self.cache_ttl);
        let scored = score_payload(&raw, &query, self.clock.now());
        let results = scored.into_domain(domain);
        self.observer
            .on_search_complete(domain.as_str(), query.as_str(), results.len());
        Ok(results)
    }

    /// Cancels whatever submit-stream request is currently in flight.
    pub fn cancel_in_flight(&self) {
        self.submit_stream.cancel_current();
    }

    /// The shared response cache.
    #[must_use]
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Supersedes the stream's previous request and runs one fetch under a
    /// fresh token. Any settlement that arrives after the token has been
    /// cancelled is discarded as [`SearchError::Cancelled`].
    async fn fetch_guarded<F, Fut>(
        &self,
        stream: &RequestStream,
        scope: &str,
        query: &Query,
        fetch: F,
    ) -> Result<RawSearchPayload, SearchError>
    where
        F: FnOnce(Query) -> Fut,
        Fut: Future<Output = Result<RawSearchPayload, SearchError>>,
    {
        let token = stream.begin();
        self.observer.on_search_start(scope, query.as_str());

        let settlement = Self::run_abortable(&token, fetch(query.clone())).await;
        match settlement {
            Ok(raw) => Ok(raw),
            Err(SearchError::Cancelled) => {
                debug!(scope, query = %query, "search superseded; settlement dropped");
                Err(SearchError::Cancelled)
            }
            Err(err) => {
                self.observer.on_search_error(scope, query.as_str(), &err);
                match &err {
                    SearchError::Unknown(detail) => {
                        error!(scope, query = %query, detail = %detail, "search failed unexpectedly");
                    }
                    other => {
                        warn!(scope, query = %query, error = %other, "search failed");
                    }
                }
                Err(err)
            }
        }
    }

    async fn run_abortable<Fut>(
        token: &CancelToken,
        fetch: Fut,
    ) -> Result<RawSearchPayload, SearchError>
    where
        Fut: Future<Output = Result<RawSearchPayload, SearchError>>,
    {
        let (handle, registration) = AbortHandle::new_pair();
        {
            let handle = handle.clone();
            token.on_cancel(move || handle.abort());
        }

        match Abortable::new(fetch, registration).await {
            // A token cancelled between settlement and commit still loses.
            Ok(settled) if token.is_cancelled() => {
                drop(settled);
                Err(SearchError::Cancelled)
            }
            Ok(settled) => settled,
            Err(futures::future::Aborted) => Err(SearchError::Cancelled),
        }
    }
}

impl std::fmt::Debug for SearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchService")
            .field("cache", &self.cache)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{future_event_payload, sample_payload, ManualClock, RecordingObserver, StubBackend};

    fn service() -> (Arc<SearchService>, Arc<StubBackend>, Arc<ManualClock>) {
        let backend = Arc::new(StubBackend::new());
        let clock = Arc::new(ManualClock::recent());
        let service = Arc::new(SearchService::new(backend.clone(), clock.clone()));
        (service, backend, clock)
    }

    #[tokio::test]
    async fn test_blank_query_rejected_before_network() {
        let (service, backend, _) = service();
        let err = service.search_all("   ", true).await.unwrap_err();
        assert_eq!(err, SearchError::EmptyQuery);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_cached_search_is_idempotent() {
        let (service, backend, _) = service();
        backend.put("batman", sample_payload());

        let first = service.search_all("batman", true).await.unwrap();
        let second = service.search_all("batman", true).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_cache_bypass_refetches() {
        let (service, backend, _) = service();
        backend.put("batman", sample_payload());

        let _ = service.search_all("batman", true).await.unwrap();
        let _ = service.search_all("batman", false).await.unwrap();
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_ttl_expiry_triggers_exactly_one_refetch() {
        let (service, backend, clock) = service();
        backend.put("batman", sample_payload());

        let _ = service.search_all("batman", true).await.unwrap();
        assert_eq!(backend.call_count(), 1);

        // Within the TTL: still served from cache.
        clock.advance(chrono::Duration::milliseconds(299_000));
        let _ = service.search_all("batman", true).await.unwrap();
        assert_eq!(backend.call_count(), 1);

        // Past the TTL: one refetch, then cached again.
        clock.advance(chrono::Duration::milliseconds(2_000));
        let _ = service.search_all("batman", true).await.unwrap();
        let _ = service.search_all("batman", true).await.unwrap();
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_query_normalization_shares_cache_entries() {
        let (service, backend, _) = service();
        backend.put("batman", sample_payload());

        let _ = service.search_all("Batman", true).await.unwrap();
        let _ = service.search_all("  BATMAN ", true).await.unwrap();
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_by_type_uses_its_own_namespace() {
        let (service, backend, _) = service();
        backend.put("batman", sample_payload());

        let threads = service
            .search_by_type("batman", Domain::Thread, true)
            .await
            .unwrap();
        assert!(threads.iter().all(|r| r.domain == Domain::Thread));

        // The all-domain namespace is separate, so this fetches again.
        let _ = service.search_all("batman", true).await.unwrap();
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_backend_errors_pass_through_taxonomy() {
        let (service, backend, _) = service();
        backend.fail_with(SearchError::RateLimited);

        let err = service.search_all("batman", true).await.unwrap_err();
        assert_eq!(err, SearchError::RateLimited);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let (service, backend, _) = service();
        backend.fail_with(SearchError::Server(500));
        let _ = service.search_all("batman", true).await.unwrap_err();

        backend.clear_failure();
        backend.put("batman", sample_payload());
        let response = service.search_all("batman", true).await.unwrap();
        assert!(response.total_results > 0);
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_request_is_discarded() {
        let (service, backend, _) = service();
        backend.put("alpha", sample_payload());
        backend.put("beta", sample_payload());
        backend.set_latency(Duration::from_millis(100));

        let first = {
            let service = service.clone();
            tokio::spawn(async move { service.search_all("alpha", false).await })
        };
        // Let the first request register its token before superseding it.
        tokio::task::yield_now().await;

        let second = service.search_all("beta", false).await;
        assert!(second.is_ok());

        let first = first.await.unwrap();
        assert_eq!(first.unwrap_err(), SearchError::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropdown_stream_does_not_supersede_submit() {
        let (service, backend, _) = service();
        backend.put("alpha", sample_payload());
        backend.set_latency(Duration::from_millis(50));

        let submit = {
            let service = service.clone();
            tokio::spawn(async move { service.search_all("alpha", false).await })
        };
        tokio::task::yield_now().await;

        // A preview on its own stream must not cancel the submit.
        let preview_stream = RequestStream::new("dropdown");
        let preview = service
            .search_all_on(&preview_stream, "alpha", false)
            .await;
        assert!(preview.is_ok());

        let submit = submit.await.unwrap();
        assert!(submit.is_ok());
    }

    #[tokio::test]
    async fn test_observer_sees_lifecycle_and_cache_hits() {
        let backend = Arc::new(StubBackend::new());
        let clock = Arc::new(ManualClock::recent());
        let observer = Arc::new(RecordingObserver::new());
        let service = SearchService::new(backend.clone(), clock)
            .with_observer(observer.clone());
        backend.put("batman", sample_payload());

        let _ = service.search_all("batman", true).await.unwrap();
        let _ = service.search_all("batman", true).await.unwrap();

        let events = observer.events();
        assert!(events.iter().any(|e| e.starts_with("start:all:batman")));
        assert!(events.iter().any(|e| e.starts_with("complete:all:batman")));
        assert!(events.contains(&"cache:search_all_batman".to_string()));
    }

    #[tokio::test]
    async fn test_cancel_in_flight_without_request_is_noop() {
        let (service, _, _) = service();
        service.cancel_in_flight();
    }

    #[tokio::test]
    async fn test_scores_recomputed_on_cache_hit() {
        let backend = Arc::new(StubBackend::new());
        let clock = Arc::new(ManualClock::recent());
        let service = SearchService::new(backend.clone(), clock.clone())
            .with_cache_ttl(Duration::from_secs(60 * 60 * 24 * 30));
        backend.put("meetup", future_event_payload(clock.now()));

        let before = service.search_all("meetup", true).await.unwrap();
        let with_future_bonus = before.events[0].relevance_score;

        // Same cached payload read after the event date has passed: the
        // score derived at read time loses the future-event bonus.
        clock.advance(chrono::Duration::days(10));
        let after = service.search_all("meetup", true).await.unwrap();
        assert_eq!(backend.call_count(), 1);
        assert!(after.events[0].relevance_score < with_future_bonus);
    }
}
