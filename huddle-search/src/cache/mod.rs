//! Response cache with lazy TTL expiry.
//!
//! The cache stores raw backend payloads keyed by
//! `"search_{domain|all}_{normalized query}"`. Entries expire lazily: a read
//! past `stored_at + ttl` deletes the entry and reports a miss; there is no
//! background sweep. Count is unbounded for the session's lifetime, which is
//! acceptable because the cache only grows per unique query string.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use crate::clock::Clock;
use crate::models::raw::RawSearchPayload;
use crate::models::Domain;
use crate::query::Query;

/// Default entry lifetime: five minutes.
pub const DEFAULT_TTL: Duration = Duration::from_millis(300_000);

/// A cached raw payload with its expiry bookkeeping.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The raw payload as fetched; scores are never stored.
    pub data: RawSearchPayload,
    /// When the entry was written.
    pub stored_at: DateTime<Utc>,
    /// How long the entry stays fresh after `stored_at`.
    pub ttl: chrono::Duration,
}

impl CacheEntry {
    /// Whether the entry has outlived its TTL at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.stored_at) > self.ttl
    }
}

/// Session-lifetime cache of raw search payloads.
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    /// Creates an empty cache reading time from `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Builds the namespaced key for a query, `None` meaning all domains.
    #[must_use]
    pub fn key(domain: Option<Domain>, query: &Query) -> String {
        let scope = domain.map_or("all", Domain::as_str);
        format!("search_{scope}_{query}")
    }

    /// Looks up a fresh entry, deleting it if it has expired.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<RawSearchPayload> {
        let now = self.clock.now();
        let fresh = {
            let entry = self.entries.get(key)?;
            if entry.is_expired(now) {
                None
            } else {
                Some(entry.data.clone())
            }
        };
        if fresh.is_none() {
            self.entries.remove(key);
            debug!(key, "cache entry expired");
        }
        fresh
    }

    /// Stores a raw payload under `key` with the given TTL.
    pub fn set(&self, key: &str, data: RawSearchPayload, ttl: Duration) {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::MAX);
        let entry = CacheEntry {
            data,
            stored_at: self.clock.now(),
            ttl,
        };
        self.entries.insert(key.to_string(), entry);
    }

    /// Removes a single entry.
    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of live entries, counting any not-yet-collected expired ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}
