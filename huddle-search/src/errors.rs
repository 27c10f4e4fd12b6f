//! Error taxonomy for search operations.
//!
//! Every failure a search can produce is mapped into [`SearchError`] before
//! it leaves the service layer; callers never see raw transport errors.
//! Variants are listed in priority order of detection.

use thiserror::Error;

/// The error type for all search operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The request was superseded by a newer one or explicitly aborted.
    ///
    /// Never surfaced to the user; consumers drop it silently.
    #[error("Search cancelled")]
    Cancelled,

    /// A blank or whitespace-only query was submitted.
    ///
    /// Rejected before any network attempt.
    #[error("Search query must not be empty")]
    EmptyQuery,

    /// Transport-level failure: the request never produced a response.
    #[error("Network failure: {0}")]
    Network(String),

    /// The backend rejected the query as malformed (HTTP 400).
    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    /// The endpoint demands authentication the caller lacks (HTTP 401).
    #[error("Authentication required")]
    AuthRequired,

    /// Authenticated but not permitted (HTTP 403).
    #[error("Access forbidden")]
    Forbidden,

    /// The caller is being throttled (HTTP 429). No automatic retry is
    /// performed here; retry policy belongs to the caller.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// The backend failed (HTTP 5xx).
    #[error("Server error (status {0})")]
    Server(u16),

    /// Fallback for anything unclassified.
    #[error("Unexpected search failure: {0}")]
    Unknown(String),
}

impl SearchError {
    /// Maps a non-success HTTP status code into the taxonomy.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::InvalidQuery("rejected by the server".to_string()),
            401 => Self::AuthRequired,
            403 => Self::Forbidden,
            429 => Self::RateLimited,
            500..=599 => Self::Server(status),
            other => Self::Unknown(format!("unexpected HTTP status {other}")),
        }
    }

    /// Whether this is a cancellation, which is suppressed rather than shown.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// A human-readable message suitable for direct display.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Cancelled => "Search cancelled.".to_string(),
            Self::EmptyQuery => "Please enter a search query.".to_string(),
            Self::Network(_) => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            }
            Self::InvalidQuery(_) => {
                "That search couldn't be processed. Try different keywords.".to_string()
            }
            Self::AuthRequired => "Sign in to search.".to_string(),
            Self::Forbidden => "You don't have permission to search this content.".to_string(),
            Self::RateLimited => {
                "You're searching too quickly. Wait a moment and try again.".to_string()
            }
            Self::Server(_) => "Something went wrong on our end. Try again later.".to_string(),
            Self::Unknown(_) => "Search failed. Try again.".to_string(),
        }
    }
}
