//! Configuration for the search engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the debounced dropdown preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownConfig {
    /// Minimum query length before any preview search runs.
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
    /// Debounce window in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Maximum results shown per domain.
    #[serde(default = "default_max_per_domain")]
    pub max_per_domain: usize,
}

fn default_min_query_len() -> usize {
    2
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_max_per_domain() -> usize {
    3
}

impl Default for DropdownConfig {
    fn default() -> Self {
        Self {
            min_query_len: default_min_query_len(),
            debounce_ms: default_debounce_ms(),
            max_per_domain: default_max_per_domain(),
        }
    }
}

impl DropdownConfig {
    /// Creates a dropdown configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum query length.
    #[must_use]
    pub fn with_min_query_len(mut self, len: usize) -> Self {
        self.min_query_len = len;
        self
    }

    /// Sets the debounce window.
    #[must_use]
    pub fn with_debounce_ms(mut self, millis: u64) -> Self {
        self.debounce_ms = millis;
        self
    }

    /// Sets the per-domain result cap.
    #[must_use]
    pub fn with_max_per_domain(mut self, max: usize) -> Self {
        self.max_per_domain = max;
        self
    }

    /// Debounce window as a `Duration`.
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Top-level configuration for the search engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the REST backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Response cache TTL in milliseconds.
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,
    /// Storage key for the durable history slot.
    #[serde(default = "default_history_key")]
    pub history_key: String,
    /// Storage key for the session-scoped state slot.
    #[serde(default = "default_session_key")]
    pub session_key: String,
    /// Dropdown preview configuration.
    #[serde(default)]
    pub dropdown: DropdownConfig,
}

fn default_base_url() -> String {
    "https://api.huddle.app".to_string()
}

fn default_cache_ttl_ms() -> u64 {
    300_000
}

fn default_history_key() -> String {
    "huddle.search.history".to_string()
}

fn default_session_key() -> String {
    "huddle.search.session".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cache_ttl_ms: default_cache_ttl_ms(),
            history_key: default_history_key(),
            session_key: default_session_key(),
            dropdown: DropdownConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the backend base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the cache TTL.
    #[must_use]
    pub fn with_cache_ttl_ms(mut self, millis: u64) -> Self {
        self.cache_ttl_ms = millis;
        self
    }

    /// Sets the dropdown configuration.
    #[must_use]
    pub fn with_dropdown(mut self, dropdown: DropdownConfig) -> Self {
        self.dropdown = dropdown;
        self
    }

    /// Cache TTL as a `Duration`.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = SearchConfig::default();
        assert_eq!(config.cache_ttl(), Duration::from_millis(300_000));
        assert_eq!(config.dropdown.min_query_len, 2);
        assert_eq!(config.dropdown.debounce(), Duration::from_millis(300));
        assert_eq!(config.dropdown.max_per_domain, 3);
        assert_ne!(config.history_key, config.session_key);
    }

    #[test]
    fn test_builders() {
        let config = SearchConfig::new()
            .with_base_url("https://staging.huddle.app")
            .with_cache_ttl_ms(60_000)
            .with_dropdown(DropdownConfig::new().with_debounce_ms(150).with_max_per_domain(5));

        assert_eq!(config.base_url, "https://staging.huddle.app");
        assert_eq!(config.cache_ttl(), Duration::from_millis(60_000));
        assert_eq!(config.dropdown.debounce_ms, 150);
        assert_eq!(config.dropdown.max_per_domain, 5);
    }

    #[test]
    fn test_deserializes_with_partial_fields() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"cache_ttl_ms": 1000}"#).unwrap();
        assert_eq!(config.cache_ttl_ms, 1000);
        assert_eq!(config.dropdown.min_query_len, 2);
        assert_eq!(config.base_url, "https://api.huddle.app");
    }
}
