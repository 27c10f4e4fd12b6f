//! Search filters and their merge semantics.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Domain, SearchResponse, SearchResult};

/// Domain filter: everything, or one content kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainFilter {
    /// Search every domain.
    #[default]
    All,
    /// Clubs only.
    Club,
    /// Threads only.
    Thread,
    /// Events only.
    Event,
    /// Media only.
    Media,
}

impl DomainFilter {
    /// The concrete domain, or `None` for [`DomainFilter::All`].
    #[must_use]
    pub fn as_domain(self) -> Option<Domain> {
        match self {
            Self::All => None,
            Self::Club => Some(Domain::Club),
            Self::Thread => Some(Domain::Thread),
            Self::Event => Some(Domain::Event),
            Self::Media => Some(Domain::Media),
        }
    }

    /// The URL token for this filter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Club => "club",
            Self::Thread => "thread",
            Self::Event => "event",
            Self::Media => "media",
        }
    }

    /// Parses a URL token; unknown values read as `None`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "all" => Some(Self::All),
            "club" => Some(Self::Club),
            "thread" => Some(Self::Thread),
            "event" => Some(Self::Event),
            "media" => Some(Self::Media),
            _ => None,
        }
    }
}

/// Result ordering applied after scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Relevance order as produced by the scorer. The default.
    #[default]
    Relevance,
    /// Newest first.
    Recent,
    /// Oldest first.
    Oldest,
}

impl SortBy {
    /// The URL token for this ordering.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Recent => "recent",
            Self::Oldest => "oldest",
        }
    }

    /// Parses a URL token; unknown values read as `None`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "relevance" => Some(Self::Relevance),
            "recent" => Some(Self::Recent),
            "oldest" => Some(Self::Oldest),
            _ => None,
        }
    }
}

/// Creation-time window a result must fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// The last 24 hours.
    Day,
    /// The last 7 days.
    Week,
    /// The last 30 days.
    Month,
    /// The last 365 days.
    Year,
}

impl TimeRange {
    /// The URL token for this range.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Parses a URL token; unknown values read as `None`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            _ => None,
        }
    }

    /// The earliest creation time still inside the window at `now`.
    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let span = match self {
            Self::Day => Duration::days(1),
            Self::Week => Duration::days(7),
            Self::Month => Duration::days(30),
            Self::Year => Duration::days(365),
        };
        now - span
    }
}

/// The active filter set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// Which domains to search.
    #[serde(default)]
    pub domain: DomainFilter,
    /// How to order results.
    #[serde(default)]
    pub sort_by: SortBy,
    /// Optional creation-time window.
    #[serde(default)]
    pub time_range: Option<TimeRange>,
}

/// A partial filter change, merged over the current filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    /// New domain filter, if changing.
    pub domain: Option<DomainFilter>,
    /// New ordering, if changing.
    pub sort_by: Option<SortBy>,
    /// New time window, if changing (`Some(None)` clears it).
    pub time_range: Option<Option<TimeRange>>,
}

impl SearchFilters {
    /// Whether every field holds its default value.
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Merges a partial update over these filters.
    #[must_use]
    pub fn merged(self, update: FilterUpdate) -> Self {
        Self {
            domain: update.domain.unwrap_or(self.domain),
            sort_by: update.sort_by.unwrap_or(self.sort_by),
            time_range: update.time_range.unwrap_or(self.time_range),
        }
    }

    /// Applies the sort and time-range view transforms to a scored response.
    ///
    /// Relevance ordering and totals are recomputed from whatever survives
    /// the time window.
    #[must_use]
    pub fn apply(&self, response: SearchResponse, now: DateTime<Utc>) -> SearchResponse {
        let transform = |results: Vec<SearchResult>| -> Vec<SearchResult> {
            let mut results: Vec<SearchResult> = match self.time_range {
                Some(range) => {
                    let cutoff = range.cutoff(now);
                    results
                        .into_iter()
                        .filter(|result| result.created_at >= cutoff)
                        .collect()
                }
                None => results,
            };
            match self.sort_by {
                SortBy::Relevance => {}
                SortBy::Recent => results.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
                SortBy::Oldest => results.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            }
            results
        };

        SearchResponse::new(
            transform(response.clubs),
            transform(response.threads),
            transform(response.events),
            transform(response.media),
        )
    }
}
