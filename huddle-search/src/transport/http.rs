//! HTTP implementation of the search backend.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{SearchBackend, TokenProvider};
use crate::errors::SearchError;
use crate::models::raw::{RawClub, RawEvent, RawMedia, RawSearchPayload, RawThread};
use crate::models::Domain;
use crate::query::Query;

/// Backend speaking to `GET {base}/search/?q=` and `GET {base}/search/{domain}?q=`.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl HttpBackend {
    /// Creates a backend for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Unknown`] if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("huddle-search/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| SearchError::Unknown(format!("building HTTP client: {err}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// Formats the bearer header value when a token is available.
    pub(crate) async fn bearer(&self) -> Option<String> {
        self.tokens.token().await.map(|token| format!("Bearer {token}"))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
    ) -> Result<T, SearchError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, query = %query, "dispatching search request");

        let mut request = self.client.get(&url).query(&[("q", query.as_str())]);
        if let Some(header) = self.bearer().await {
            request = request.header(reqwest::header::AUTHORIZATION, header);
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::from_status(status.as_u16()));
        }
        response
            .json::<T>()
            .await
            .map_err(|err| SearchError::Unknown(format!("decoding search response: {err}")))
    }
}

fn map_transport_error(err: reqwest::Error) -> SearchError {
    if err.is_decode() {
        SearchError::Unknown(format!("decoding search response: {err}"))
    } else {
        SearchError::Network(err.to_string())
    }
}

#[async_trait]
impl SearchBackend for HttpBackend {
    async fn fetch_all(&self, query: &Query) -> Result<RawSearchPayload, SearchError> {
        self.get_json("/search/", query).await
    }

    async fn fetch_domain(
        &self,
        domain: Domain,
        query: &Query,
    ) -> Result<RawSearchPayload, SearchError> {
        let path = format!("/search/{domain}");
        Ok(match domain {
            Domain::Club => RawSearchPayload {
                clubs: self.get_json::<Vec<RawClub>>(&path, query).await?,
                ..Default::default()
            },
            Domain::Thread => RawSearchPayload {
                threads: self.get_json::<Vec<RawThread>>(&path, query).await?,
                ..Default::default()
            },
            Domain::Event => RawSearchPayload {
                events: self.get_json::<Vec<RawEvent>>(&path, query).await?,
                ..Default::default()
            },
            Domain::Media => RawSearchPayload {
                media: self.get_json::<Vec<RawMedia>>(&path, query).await?,
                ..Default::default()
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{AnonymousTokens, MockTokenProvider};

    #[tokio::test]
    async fn test_bearer_header_from_provider() {
        let mut provider = MockTokenProvider::new();
        provider
            .expect_token()
            .times(1)
            .returning(|| Some("secret".to_string()));

        let backend = HttpBackend::new("https://api.huddle.test", Arc::new(provider)).unwrap();
        assert_eq!(backend.bearer().await, Some("Bearer secret".to_string()));
    }

    #[tokio::test]
    async fn test_missing_token_means_no_header() {
        let backend =
            HttpBackend::new("https://api.huddle.test/", Arc::new(AnonymousTokens)).unwrap();
        assert_eq!(backend.bearer().await, None);
        // Trailing slash on the base URL is normalized away.
        assert_eq!(backend.base_url, "https://api.huddle.test");
    }
}
