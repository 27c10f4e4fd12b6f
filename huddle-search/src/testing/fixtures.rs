//! Canned raw payloads for tests and benchmarks.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::models::raw::{RawClub, RawEvent, RawMedia, RawSearchPayload, RawThread};

/// A fixed reference time fixtures are built around.
fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().unwrap_or_default()
}

/// A small payload with one item in every domain.
#[must_use]
pub fn sample_payload() -> RawSearchPayload {
    let now = reference_time();
    RawSearchPayload {
        clubs: vec![RawClub {
            id: "club-1".to_string(),
            name: "Graphic Novel Club".to_string(),
            description: Some("Weekly graphic novel discussions".to_string()),
            created_at: now - Duration::days(120),
            is_member: false,
            member_count: 64,
        }],
        threads: vec![RawThread {
            id: "thread-1".to_string(),
            title: "What are you reading this week?".to_string(),
            content: Some("Share your current reads".to_string()),
            created_at: now - Duration::days(3),
            view_count: 82,
            comment_count: 14,
            is_pinned: false,
        }],
        events: vec![RawEvent {
            id: "event-1".to_string(),
            title: "Summer reading kickoff".to_string(),
            description: Some("Season opener at the park".to_string()),
            created_at: now - Duration::days(10),
            event_date: now + Duration::days(14),
            capacity: Some(40),
            current_participants: 12,
        }],
        media: vec![RawMedia {
            id: "media-1".to_string(),
            title: "The Long Way Home".to_string(),
            description: Some("A road-trip novel".to_string()),
            created_at: now - Duration::days(200),
            author: Some("R. Alvarez".to_string()),
            release_year: Some(2022),
            genre: Some("fiction".to_string()),
        }],
    }
}

/// A payload with `per_domain` items in the club and thread domains.
///
/// Useful for exercising truncation caps.
#[must_use]
pub fn bulk_payload(per_domain: usize) -> RawSearchPayload {
    let now = reference_time();
    RawSearchPayload {
        clubs: (0..per_domain)
            .map(|i| RawClub {
                id: format!("club-{i}"),
                name: format!("Club {i}"),
                created_at: now - Duration::days(30),
                member_count: (i as u32) * 10,
                ..Default::default()
            })
            .collect(),
        threads: (0..per_domain)
            .map(|i| RawThread {
                id: format!("thread-{i}"),
                title: format!("Thread {i}"),
                created_at: now - Duration::days(5),
                view_count: (i as u32) * 25,
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

/// A payload holding a single event a few days after `now`.
#[must_use]
pub fn future_event_payload(now: DateTime<Utc>) -> RawSearchPayload {
    RawSearchPayload {
        events: vec![RawEvent {
            id: "event-future".to_string(),
            title: "Community meetup".to_string(),
            description: Some("Monthly community meetup".to_string()),
            created_at: now - Duration::days(2),
            event_date: now + Duration::days(3),
            capacity: Some(25),
            current_participants: 8,
        }],
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_payload_covers_all_domains() {
        let payload = sample_payload();
        assert_eq!(payload.len(), 4);
        assert!(!payload.is_empty());
    }

    #[test]
    fn test_bulk_payload_size() {
        let payload = bulk_payload(5);
        assert_eq!(payload.clubs.len(), 5);
        assert_eq!(payload.threads.len(), 5);
        assert!(payload.events.is_empty());
    }

    #[test]
    fn test_future_event_is_in_the_future() {
        let now = reference_time();
        let payload = future_event_payload(now);
        assert!(payload.events[0].event_date > now);
    }
}
