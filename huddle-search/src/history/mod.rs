//! Bounded, deduplicated search history.
//!
//! History outlives the session: it persists through a [`KeyValueStore`]
//! under a fixed namespaced key. Every operation tolerates a corrupted or
//! missing backing value: parse failures read as an empty list, and write
//! failures are logged and swallowed so history can never break a search.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::clock::Clock;
use crate::storage::KeyValueStore;

/// Maximum number of retained history entries.
pub const HISTORY_CAP: usize = 10;

/// Default storage key for the history slot.
pub const DEFAULT_HISTORY_KEY: &str = "huddle.search.history";

/// One remembered query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    /// Stable identifier for removal.
    pub id: Uuid,
    /// The query as the user submitted it (post-trim).
    pub query: String,
    /// When the search ran.
    pub timestamp: DateTime<Utc>,
    /// How many results it produced.
    pub result_count: usize,
}

/// Durable store of past queries, most recent first.
pub struct HistoryStore {
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    key: String,
    cap: usize,
}

impl HistoryStore {
    /// Creates a store over `storage` with the default key and cap.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            key: DEFAULT_HISTORY_KEY.to_string(),
            cap: HISTORY_CAP,
        }
    }

    /// Overrides the storage key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Overrides the retention cap.
    #[must_use]
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }

    /// Returns all entries, most recent first.
    #[must_use]
    pub fn list(&self) -> Vec<HistoryItem> {
        self.load()
    }

    /// Records a query: dedup (case-insensitive), prepend, truncate.
    ///
    /// Blank queries are ignored. Returns the stored item when one was
    /// written.
    pub fn add(&self, query: &str, result_count: usize) -> Option<HistoryItem> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let mut items = self.load();
        let lowered = query.to_lowercase();
        items.retain(|item| item.query.to_lowercase() != lowered);

        let item = HistoryItem {
            id: Uuid::new_v4(),
            query: query.to_string(),
            timestamp: self.clock.now(),
            result_count,
        };
        items.insert(0, item.clone());
        items.truncate(self.cap);

        self.persist(&items);
        Some(item)
    }

    /// Removes the entry with the given id. Returns whether anything changed.
    pub fn remove(&self, id: Uuid) -> bool {
        let mut items = self.load();
        let before = items.len();
        items.retain(|item| item.id != id);
        let changed = items.len() != before;
        if changed {
            self.persist(&items);
        }
        changed
    }

    /// Deletes every entry.
    pub fn clear(&self) {
        self.persist(&[]);
    }

    fn load(&self) -> Vec<HistoryItem> {
        match self.storage.get(&self.key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(key = %self.key, error = %err, "discarding corrupt history");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(key = %self.key, error = %err, "history storage read failed");
                Vec::new()
            }
        }
    }

    fn persist(&self, items: &[HistoryItem]) {
        let serialized = match serde_json::to_string(items) {
            Ok(serialized) => serialized,
            Err(err) => {
                warn!(key = %self.key, error = %err, "history serialization failed");
                return;
            }
        };
        if let Err(err) = self.storage.set(&self.key, &serialized) {
            warn!(key = %self.key, error = %err, "history storage write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::storage::MemoryStore;

    fn store() -> (HistoryStore, Arc<MemoryStore>) {
        let storage = Arc::new(MemoryStore::new());
        let history = HistoryStore::new(storage.clone(), Arc::new(SystemClock));
        (history, storage)
    }

    #[test]
    fn test_add_prepends_newest_first() {
        let (history, _) = store();
        history.add("first", 1);
        history.add("second", 2);

        let items = history.list();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].query, "second");
        assert_eq!(items[1].query, "first");
    }

    #[test]
    fn test_cap_keeps_ten_entries() {
        let (history, _) = store();
        for i in 0..11 {
            history.add(&format!("query {i}"), i);
        }

        let items = history.list();
        assert_eq!(items.len(), HISTORY_CAP);
        assert_eq!(items[0].query, "query 10");
        // The oldest entry fell off.
        assert!(!items.iter().any(|item| item.query == "query 0"));
    }

    #[test]
    fn test_dedup_is_case_insensitive_and_moves_to_front() {
        let (history, _) = store();
        history.add("Batman", 5);
        history.add("gardening", 2);
        history.add("BATMAN", 7);

        let items = history.list();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].query, "BATMAN");
        assert_eq!(items[0].result_count, 7);
        assert_eq!(items[1].query, "gardening");
    }

    #[test]
    fn test_blank_query_ignored() {
        let (history, _) = store();
        assert!(history.add("   ", 3).is_none());
        assert!(history.list().is_empty());
    }

    #[test]
    fn test_remove_by_id() {
        let (history, _) = store();
        let kept = history.add("keep", 1).unwrap();
        let dropped = history.add("drop", 1).unwrap();

        assert!(history.remove(dropped.id));
        assert!(!history.remove(dropped.id));

        let items = history.list();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, kept.id);
    }

    #[test]
    fn test_clear_empties_store() {
        let (history, _) = store();
        history.add("a", 1);
        history.add("b", 2);
        history.clear();
        assert!(history.list().is_empty());
    }

    #[test]
    fn test_corrupt_backing_value_reads_as_empty() {
        let (history, storage) = store();
        storage.set(DEFAULT_HISTORY_KEY, "{not valid json").unwrap();
        assert!(history.list().is_empty());

        // And the store recovers on the next write.
        history.add("fresh", 1);
        assert_eq!(history.list().len(), 1);
    }

    #[test]
    fn test_survives_reinitialized_store() {
        let storage = Arc::new(MemoryStore::new());
        {
            let history = HistoryStore::new(storage.clone(), Arc::new(SystemClock));
            history.add("durable", 4);
        }
        let fresh = HistoryStore::new(storage, Arc::new(SystemClock));
        assert_eq!(fresh.list()[0].query, "durable");
    }
}
