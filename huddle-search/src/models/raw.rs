//! Raw wire payloads returned by the search endpoint.
//!
//! These are the shapes the backend serves (camelCase JSON) and the only
//! thing the response cache stores: scores are derived from them at read
//! time, never persisted. Any ranking field the server might include is
//! simply ignored during deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Domain;

/// A club as the backend returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClub {
    /// Backend identifier.
    pub id: String,
    /// Club name.
    pub name: String,
    /// Club description.
    #[serde(default)]
    pub description: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    /// Whether the requesting user is a member.
    #[serde(default)]
    pub is_member: bool,
    /// Current member count.
    #[serde(default)]
    pub member_count: u32,
}

/// A discussion thread as the backend returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawThread {
    /// Backend identifier.
    pub id: String,
    /// Thread title.
    pub title: String,
    /// Body content.
    #[serde(default)]
    pub content: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    /// Total view count.
    #[serde(default)]
    pub view_count: u32,
    /// Total comment count.
    #[serde(default)]
    pub comment_count: u32,
    /// Whether the thread is pinned.
    #[serde(default)]
    pub is_pinned: bool,
}

/// An event as the backend returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    /// Backend identifier.
    pub id: String,
    /// Event title.
    pub title: String,
    /// Event description.
    #[serde(default)]
    pub description: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    /// When the event takes place.
    #[serde(default)]
    pub event_date: DateTime<Utc>,
    /// Maximum attendance, if bounded.
    #[serde(default)]
    pub capacity: Option<u32>,
    /// Current participant count.
    #[serde(default)]
    pub current_participants: u32,
}

/// A media item as the backend returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMedia {
    /// Backend identifier.
    pub id: String,
    /// Media title.
    pub title: String,
    /// Media description.
    #[serde(default)]
    pub description: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    /// Author or creator.
    #[serde(default)]
    pub author: Option<String>,
    /// Release year.
    #[serde(default)]
    pub release_year: Option<i32>,
    /// Genre label.
    #[serde(default)]
    pub genre: Option<String>,
}

/// The aggregate raw payload for an all-domain search.
///
/// Also used as the cache value for single-domain searches, with only the
/// matching array filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSearchPayload {
    /// Raw clubs.
    #[serde(default)]
    pub clubs: Vec<RawClub>,
    /// Raw threads.
    #[serde(default)]
    pub threads: Vec<RawThread>,
    /// Raw events.
    #[serde(default)]
    pub events: Vec<RawEvent>,
    /// Raw media items.
    #[serde(default)]
    pub media: Vec<RawMedia>,
}

impl RawSearchPayload {
    /// The number of raw items across all domains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clubs.len() + self.threads.len() + self.events.len() + self.media.len()
    }

    /// Whether the payload carries no items at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A copy retaining only the given domain's items.
    #[must_use]
    pub fn only(&self, domain: Domain) -> Self {
        let mut payload = Self::default();
        match domain {
            Domain::Club => payload.clubs = self.clubs.clone(),
            Domain::Thread => payload.threads = self.threads.clone(),
            Domain::Event => payload.events = self.events.clone(),
            Domain::Media => payload.media = self.media.clone(),
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_camel_case_with_defaults() {
        let json = r#"{
            "clubs": [{"id": "c1", "name": "Graphic Novels", "memberCount": 42}],
            "threads": [{"id": "t1", "title": "Weekly picks", "viewCount": 10}]
        }"#;
        let payload: RawSearchPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.clubs.len(), 1);
        assert_eq!(payload.clubs[0].member_count, 42);
        assert!(!payload.clubs[0].is_member);
        assert_eq!(payload.threads[0].view_count, 10);
        assert!(payload.events.is_empty());
        assert_eq!(payload.len(), 2);
    }

    #[test]
    fn test_server_ranking_fields_are_ignored() {
        let json = r#"{"threads": [{"id": "t1", "title": "x", "relevanceScore": 99.9}]}"#;
        let payload: RawSearchPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.threads.len(), 1);
    }

    #[test]
    fn test_only_keeps_one_domain() {
        let payload = RawSearchPayload {
            clubs: vec![RawClub {
                id: "c1".to_string(),
                name: "c".to_string(),
                ..Default::default()
            }],
            threads: vec![RawThread {
                id: "t1".to_string(),
                title: "t".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let only_threads = payload.only(Domain::Thread);
        assert!(only_threads.clubs.is_empty());
        assert_eq!(only_threads.threads.len(), 1);
    }
}
