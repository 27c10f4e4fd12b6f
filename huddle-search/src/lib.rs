//! # Huddle Search
//!
//! Client-side search aggregation and relevance engine for the Huddle
//! community platform.
//!
//! A single query fans out to four content domains (clubs, threads, events,
//! media); results are scored and ordered locally, responses are cached,
//! interactive lookups are debounced, superseded requests are cancelled,
//! and both search history and in-flight search state survive navigation.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use huddle_search::prelude::*;
//! use std::sync::Arc;
//!
//! let backend = Arc::new(HttpBackend::new("https://api.huddle.app", Arc::new(AnonymousTokens))?);
//! let clock = Arc::new(SystemClock);
//! let service = Arc::new(SearchService::new(backend, clock.clone()));
//!
//! let response = service.search_all("book club", true).await?;
//! println!("{} results", response.total_results);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cache;
pub mod cancellation;
pub mod clock;
pub mod config;
pub mod debounce;
pub mod dropdown;
pub mod errors;
pub mod history;
pub mod models;
pub mod observability;
pub mod query;
pub mod scoring;
pub mod service;
pub mod state;
pub mod storage;
pub mod testing;
pub mod transport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cache::ResponseCache;
    pub use crate::cancellation::{CancelToken, RequestStream};
    pub use crate::clock::{Clock, SystemClock};
    pub use crate::config::{DropdownConfig, SearchConfig};
    pub use crate::dropdown::{DropdownSearch, DropdownState};
    pub use crate::errors::SearchError;
    pub use crate::history::{HistoryItem, HistoryStore};
    pub use crate::models::{
        Domain, RawSearchPayload, ResultDetails, SearchResponse, SearchResult,
    };
    pub use crate::query::Query;
    pub use crate::service::SearchService;
    pub use crate::state::{
        DomainFilter, FilterUpdate, SearchFilters, SearchPhase, SearchState,
        SearchStateStore, SessionSlot, SortBy, TimeRange,
    };
    pub use crate::storage::{FileStore, KeyValueStore, MemoryStore};
    pub use crate::transport::{
        AnonymousTokens, HttpBackend, SearchBackend, StaticToken, TokenProvider,
    };
}
