//! Transport seam between the engine and the remote search endpoint.
//!
//! The engine only ever talks to [`SearchBackend`]; the HTTP implementation
//! lives in [`http`]. Authentication is a separate seam ([`TokenProvider`])
//! so anonymous search keeps working when no token source is wired up.

mod http;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

pub use http::HttpBackend;

use crate::errors::SearchError;
use crate::models::raw::RawSearchPayload;
use crate::models::Domain;
use crate::query::Query;

/// Opaque source of raw per-domain search payloads.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Fetches raw results across all domains for one query.
    async fn fetch_all(&self, query: &Query) -> Result<RawSearchPayload, SearchError>;

    /// Fetches raw results for a single domain.
    ///
    /// Only the matching array of the returned payload is populated.
    async fn fetch_domain(
        &self,
        domain: Domain,
        query: &Query,
    ) -> Result<RawSearchPayload, SearchError>;
}

/// Accessor for the caller's auth token, if any.
///
/// A `None` token means anonymous search; it must never block a request.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns the current bearer token, when one exists.
    async fn token(&self) -> Option<String>;
}

/// Token provider for anonymous sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousTokens;

#[async_trait]
impl TokenProvider for AnonymousTokens {
    async fn token(&self) -> Option<String> {
        None
    }
}

/// Token provider wrapping a fixed token string.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    /// Wraps a token value.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}
