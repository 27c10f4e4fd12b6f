//! Search state machine: pure reducer, effectful store, filters, URL codec.
//!
//! This module provides:
//! - [`SearchState`] / [`SearchAction`] / [`reduce`], the pure state machine
//! - [`SearchStateStore`], the store wiring the reducer to the service,
//!   history, and session persistence
//! - [`SearchFilters`] and friends: the filter vocabulary and merge rules
//! - [`url`], the shareable-URL codec

mod filters;
mod reducer;
mod store;
pub mod url;

pub use filters::{DomainFilter, FilterUpdate, SearchFilters, SortBy, TimeRange};
pub use reducer::{reduce, SearchAction, SearchPhase, SearchState};
pub use store::{SearchStateStore, SessionSlot, DEFAULT_SESSION_KEY};
