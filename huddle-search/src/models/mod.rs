//! Data model for search results.
//!
//! This module provides:
//! - The four searchable content [`Domain`]s
//! - The scored, domain-agnostic [`SearchResult`] shape consumers render
//! - The aggregate [`SearchResponse`] returned by every search flow
//! - The raw wire payloads the backend returns (see [`raw`])

pub mod raw;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use raw::{RawClub, RawEvent, RawMedia, RawSearchPayload, RawThread};

/// A searchable content domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Interest-group clubs.
    Club,
    /// Discussion threads.
    Thread,
    /// Scheduled events.
    Event,
    /// Catalogued media (books, films, and similar).
    Media,
}

impl Domain {
    /// All domains, in the order the backend aggregates them.
    pub const ALL: [Self; 4] = [Self::Club, Self::Thread, Self::Event, Self::Media];

    /// The lowercase wire name of the domain.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Club => "club",
            Self::Thread => "thread",
            Self::Event => "event",
            Self::Media => "media",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "club" => Ok(Self::Club),
            "thread" => Ok(Self::Thread),
            "event" => Ok(Self::Event),
            "media" => Ok(Self::Media),
            _ => Err(()),
        }
    }
}

/// Domain-specific fields carried alongside the common result shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResultDetails {
    /// Club extension fields.
    #[serde(rename_all = "camelCase")]
    Club {
        /// Whether the caller is already a member.
        is_member: bool,
        /// Current member count.
        member_count: u32,
    },
    /// Thread extension fields.
    #[serde(rename_all = "camelCase")]
    Thread {
        /// Total view count.
        view_count: u32,
        /// Total comment count.
        comment_count: u32,
        /// Whether the thread is pinned.
        pinned: bool,
    },
    /// Event extension fields.
    #[serde(rename_all = "camelCase")]
    Event {
        /// When the event takes place.
        starts_at: DateTime<Utc>,
        /// Maximum attendance, if bounded.
        capacity: Option<u32>,
        /// Current participant count.
        participants: u32,
    },
    /// Media extension fields.
    #[serde(rename_all = "camelCase")]
    Media {
        /// Author or creator, if known.
        author: Option<String>,
        /// Release year, if known.
        release_year: Option<i32>,
        /// Genre label, if known.
        genre: Option<String>,
    },
}

/// A single scored search result.
///
/// The common fields are identical across domains so downstream consumers
/// can render result lists without caring which domain produced them;
/// [`ResultDetails`] carries the per-domain extras.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Backend identifier of the underlying item.
    pub id: String,
    /// The domain this result came from.
    pub domain: Domain,
    /// Display title.
    pub title: String,
    /// Display description, when the item has one.
    pub description: Option<String>,
    /// When the underlying item was created.
    pub created_at: DateTime<Utc>,
    /// Client-computed relevance score, non-negative, one decimal place.
    ///
    /// Always recomputed locally; never taken from the server payload.
    pub relevance_score: f64,
    /// Domain-specific extension fields.
    #[serde(flatten)]
    pub details: ResultDetails,
}

/// Aggregate result of a search across all domains.
///
/// Each array is sorted descending by relevance score, with backend order
/// preserved on ties. `total_results` is always the exact sum of the four
/// array lengths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Scored club results.
    pub clubs: Vec<SearchResult>,
    /// Scored thread results.
    pub threads: Vec<SearchResult>,
    /// Scored event results.
    pub events: Vec<SearchResult>,
    /// Scored media results.
    pub media: Vec<SearchResult>,
    /// Sum of the four array lengths.
    pub total_results: usize,
}

impl SearchResponse {
    /// Creates an empty response.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assembles a response from per-domain arrays, computing the total.
    #[must_use]
    pub fn new(
        clubs: Vec<SearchResult>,
        threads: Vec<SearchResult>,
        events: Vec<SearchResult>,
        media: Vec<SearchResult>,
    ) -> Self {
        let total_results = clubs.len() + threads.len() + events.len() + media.len();
        Self {
            clubs,
            threads,
            events,
            media,
            total_results,
        }
    }

    /// Wraps a single domain's results, leaving the other arrays empty.
    #[must_use]
    pub fn from_domain(domain: Domain, results: Vec<SearchResult>) -> Self {
        let mut response = Self::default();
        match domain {
            Domain::Club => response.clubs = results,
            Domain::Thread => response.threads = results,
            Domain::Event => response.events = results,
            Domain::Media => response.media = results,
        }
        response.total_results = response.clubs.len()
            + response.threads.len()
            + response.events.len()
            + response.media.len();
        response
    }

    /// Takes the given domain's array out of the response.
    #[must_use]
    pub fn into_domain(self, domain: Domain) -> Vec<SearchResult> {
        match domain {
            Domain::Club => self.clubs,
            Domain::Thread => self.threads,
            Domain::Event => self.events,
            Domain::Media => self.media,
        }
    }

    /// Whether every domain array is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_results == 0
    }

    /// A copy with each domain array capped at `max_per_domain` entries.
    ///
    /// Used by the dropdown preview; totals are recomputed from the
    /// truncated arrays.
    #[must_use]
    pub fn truncated(&self, max_per_domain: usize) -> Self {
        let cap = |results: &[SearchResult]| -> Vec<SearchResult> {
            results.iter().take(max_per_domain).cloned().collect()
        };
        Self::new(
            cap(&self.clubs),
            cap(&self.threads),
            cap(&self.events),
            cap(&self.media),
        )
    }

    /// Iterates over all results across domains, in aggregation order.
    pub fn iter(&self) -> impl Iterator<Item = &SearchResult> {
        self.clubs
            .iter()
            .chain(self.threads.iter())
            .chain(self.events.iter())
            .chain(self.media.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(domain: Domain, id: &str) -> SearchResult {
        let details = match domain {
            Domain::Club => ResultDetails::Club {
                is_member: false,
                member_count: 0,
            },
            Domain::Thread => ResultDetails::Thread {
                view_count: 0,
                comment_count: 0,
                pinned: false,
            },
            Domain::Event => ResultDetails::Event {
                starts_at: Utc::now(),
                capacity: None,
                participants: 0,
            },
            Domain::Media => ResultDetails::Media {
                author: None,
                release_year: None,
                genre: None,
            },
        };
        SearchResult {
            id: id.to_string(),
            domain,
            title: id.to_string(),
            description: None,
            created_at: Utc::now(),
            relevance_score: 0.0,
            details,
        }
    }

    #[test]
    fn test_domain_roundtrip() {
        for domain in Domain::ALL {
            assert_eq!(domain.as_str().parse::<Domain>(), Ok(domain));
        }
        assert!("forum".parse::<Domain>().is_err());
    }

    #[test]
    fn test_total_results_is_sum() {
        let response = SearchResponse::new(
            vec![result(Domain::Club, "c1")],
            vec![result(Domain::Thread, "t1"), result(Domain::Thread, "t2")],
            vec![],
            vec![result(Domain::Media, "m1")],
        );
        assert_eq!(response.total_results, 4);
        assert!(!response.is_empty());
    }

    #[test]
    fn test_from_domain_fills_one_array() {
        let response = SearchResponse::from_domain(
            Domain::Event,
            vec![result(Domain::Event, "e1"), result(Domain::Event, "e2")],
        );
        assert_eq!(response.events.len(), 2);
        assert!(response.clubs.is_empty());
        assert_eq!(response.total_results, 2);
        assert_eq!(response.into_domain(Domain::Event).len(), 2);
    }

    #[test]
    fn test_truncated_caps_each_domain() {
        let threads = (0..5)
            .map(|i| result(Domain::Thread, &format!("t{i}")))
            .collect();
        let response = SearchResponse::new(vec![result(Domain::Club, "c1")], threads, vec![], vec![]);

        let preview = response.truncated(3);
        assert_eq!(preview.clubs.len(), 1);
        assert_eq!(preview.threads.len(), 3);
        assert_eq!(preview.total_results, 4);
        // Truncation keeps the leading (highest-ranked) entries.
        assert_eq!(preview.threads[0].id, "t0");
    }

    #[test]
    fn test_iter_covers_all_domains() {
        let response = SearchResponse::new(
            vec![result(Domain::Club, "c1")],
            vec![result(Domain::Thread, "t1")],
            vec![result(Domain::Event, "e1")],
            vec![result(Domain::Media, "m1")],
        );
        assert_eq!(response.iter().count(), 4);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let json = serde_json::to_value(result(Domain::Club, "c1")).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("relevanceScore").is_some());
        assert!(json.get("memberCount").is_some());
    }
}
