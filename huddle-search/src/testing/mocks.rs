//! Hand-rolled test doubles that record how they were driven.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::RwLock;

use crate::clock::Clock;
use crate::errors::SearchError;
use crate::models::raw::RawSearchPayload;
use crate::models::Domain;
use crate::observability::SearchObserver;
use crate::query::Query;
use crate::transport::SearchBackend;

/// A clock that only moves when told to.
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    /// A clock frozen at the Unix epoch.
    #[must_use]
    pub fn at_epoch() -> Self {
        Self::new(DateTime::<Utc>::default())
    }

    /// A clock frozen at a fixed recent date.
    #[must_use]
    pub fn recent() -> Self {
        let start = Utc
            .with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
            .single()
            .unwrap_or_default();
        Self::new(start)
    }

    /// Moves the clock forward.
    pub fn advance(&self, delta: chrono::Duration) {
        let mut now = self.now.write();
        *now += delta;
    }

    /// Jumps the clock to an absolute time.
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.write() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}

/// In-memory search backend with canned responses per normalized query.
///
/// Records every dispatched query, can inject failures and artificial
/// latency, and defaults to an empty payload for unknown queries.
#[derive(Default)]
pub struct StubBackend {
    responses: RwLock<HashMap<String, RawSearchPayload>>,
    failure: RwLock<Option<SearchError>>,
    latency: RwLock<Option<Duration>>,
    calls: AtomicUsize,
    queries: RwLock<Vec<String>>,
}

impl StubBackend {
    /// Creates an empty stub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the payload served for a normalized query.
    pub fn put(&self, query: &str, payload: RawSearchPayload) {
        self.responses.write().insert(query.to_string(), payload);
    }

    /// Makes every subsequent fetch fail with `error`.
    pub fn fail_with(&self, error: SearchError) {
        *self.failure.write() = Some(error);
    }

    /// Removes a previously injected failure.
    pub fn clear_failure(&self) {
        *self.failure.write() = None;
    }

    /// Adds artificial latency before each response settles.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.write() = Some(latency);
    }

    /// Number of fetches dispatched to this backend.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The normalized queries dispatched, in order.
    #[must_use]
    pub fn recorded_queries(&self) -> Vec<String> {
        self.queries.read().clone()
    }

    async fn respond(&self, query: &Query) -> Result<RawSearchPayload, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.write().push(query.as_str().to_string());

        let latency = *self.latency.read();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(error) = self.failure.read().clone() {
            return Err(error);
        }
        Ok(self
            .responses
            .read()
            .get(query.as_str())
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl SearchBackend for StubBackend {
    async fn fetch_all(&self, query: &Query) -> Result<RawSearchPayload, SearchError> {
        self.respond(query).await
    }

    async fn fetch_domain(
        &self,
        domain: Domain,
        query: &Query,
    ) -> Result<RawSearchPayload, SearchError> {
        Ok(self.respond(query).await?.only(domain))
    }
}

/// Observer that records every lifecycle event as a formatted line.
#[derive(Default)]
pub struct RecordingObserver {
    events: RwLock<Vec<String>>,
}

impl RecordingObserver {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything observed so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.events.read().clone()
    }
}

impl SearchObserver for RecordingObserver {
    fn on_search_start(&self, scope: &str, query: &str) {
        self.events.write().push(format!("start:{scope}:{query}"));
    }

    fn on_search_complete(&self, scope: &str, query: &str, total_results: usize) {
        self.events
            .write()
            .push(format!("complete:{scope}:{query}:{total_results}"));
    }

    fn on_search_error(&self, scope: &str, query: &str, error: &SearchError) {
        self.events
            .write()
            .push(format!("error:{scope}:{query}:{error}"));
    }

    fn on_cache_hit(&self, key: &str) {
        self.events.write().push(format!("cache:{key}"));
    }
}
