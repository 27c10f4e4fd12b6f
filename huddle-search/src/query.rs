//! Normalized search queries.
//!
//! A [`Query`] is the unit every cache key and scoring comparison is built
//! from: trimmed, lowercased, inner whitespace collapsed to single spaces.
//! Blank input is rejected here, before anything touches the network.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::SearchError;

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static pattern is valid"))
}

/// A validated, normalized search query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    /// Normalizes raw user input into a query.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::EmptyQuery`] if the input is blank or
    /// whitespace-only.
    pub fn parse(raw: &str) -> Result<Self, SearchError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let lowered = trimmed.to_lowercase();
        let collapsed = whitespace_run().replace_all(&lowered, " ");
        Ok(Self(collapsed.into_owned()))
    }

    /// The normalized query text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
