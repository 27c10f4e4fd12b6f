//! Relevance scoring for search results.
//!
//! Scoring is pure and deterministic: the same raw item, query, and
//! evaluation time always produce the same score. Scores combine a text
//! match tier with additive per-domain engagement bonuses, are never
//! negative, and are rounded to one decimal place. Ties keep the order the
//! backend returned (stable sort).

use chrono::{DateTime, Utc};

use crate::models::raw::{RawClub, RawEvent, RawMedia, RawSearchPayload, RawThread};
use crate::models::{Domain, ResultDetails, SearchResponse, SearchResult};
use crate::query::Query;

/// Points for an exact title match.
const EXACT_TITLE: f64 = 10.0;
/// Points for a substring title match.
const PARTIAL_TITLE: f64 = 7.0;
/// Points for a substring description/content match.
const DESCRIPTION_MATCH: f64 = 3.0;

/// Rounds a raw score to one decimal place.
#[must_use]
pub fn round_score(raw: f64) -> f64 {
    (raw * 10.0).round() / 10.0
}

/// Text-match tier: exact title, then substring title, then description.
/// First match wins; the tiers are not additive.
fn text_match(query: &Query, title: &str, description: Option<&str>) -> f64 {
    let needle = query.as_str();
    let title = title.to_lowercase();
    if title == needle {
        return EXACT_TITLE;
    }
    if title.contains(needle) {
        return PARTIAL_TITLE;
    }
    if let Some(description) = description {
        if description.to_lowercase().contains(needle) {
            return DESCRIPTION_MATCH;
        }
    }
    0.0
}

/// Stepped engagement bonus: zero when the count is zero, otherwise one
/// point per full `per` units plus one, capped at `cap`.
fn engagement(count: u32, per: u32, cap: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    f64::from(count / per + 1).min(cap)
}

/// Recency bonus from the item's age in whole days.
fn recency(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let age_days = now.signed_duration_since(created_at).num_days();
    if age_days < 7 {
        3.0
    } else if age_days < 30 {
        1.0
    } else {
        0.0
    }
}

/// Scores a club against a query.
#[must_use]
pub fn score_club(club: &RawClub, query: &Query) -> f64 {
    let mut score = text_match(query, &club.name, club.description.as_deref());
    if club.is_member {
        score += 5.0;
    }
    score += engagement(club.member_count, 100, 3.0);
    round_score(score)
}

/// Scores a thread against a query at the given evaluation time.
#[must_use]
pub fn score_thread(thread: &RawThread, query: &Query, now: DateTime<Utc>) -> f64 {
    let mut score = text_match(query, &thread.title, thread.content.as_deref());
    score += engagement(thread.view_count, 50, 3.0);
    score += engagement(thread.comment_count, 10, 2.0);
    if thread.is_pinned {
        score += 2.0;
    }
    score += recency(thread.created_at, now);
    round_score(score)
}

/// Scores an event against a query at the given evaluation time.
#[must_use]
pub fn score_event(event: &RawEvent, query: &Query, now: DateTime<Utc>) -> f64 {
    let mut score = text_match(query, &event.title, event.description.as_deref());
    if event.event_date > now {
        score += 5.0;
    }
    score += engagement(event.current_participants, 10, 2.0);
    round_score(score)
}

/// Scores a media item against a query.
#[must_use]
pub fn score_media(media: &RawMedia, query: &Query) -> f64 {
    let mut score = text_match(query, &media.title, media.description.as_deref());
    if media.release_year.is_some_and(|year| year > 2020) {
        score += 2.0;
    }
    round_score(score)
}

/// Sorts results descending by score, preserving input order on ties.
fn sort_by_score(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Scores and aggregates a raw payload into a [`SearchResponse`].
///
/// Every domain array comes back sorted descending by relevance.
#[must_use]
pub fn score_payload(
    payload: &RawSearchPayload,
    query: &Query,
    now: DateTime<Utc>,
) -> SearchResponse {
    let mut clubs: Vec<SearchResult> = payload
        .clubs
        .iter()
        .map(|club| SearchResult {
            id: club.id.clone(),
            domain: Domain::Club,
            title: club.name.clone(),
            description: club.description.clone(),
            created_at: club.created_at,
            relevance_score: score_club(club, query),
            details: ResultDetails::Club {
                is_member: club.is_member,
                member_count: club.member_count,
            },
        })
        .collect();

    let mut threads: Vec<SearchResult> = payload
        .threads
        .iter()
        .map(|thread| SearchResult {
            id: thread.id.clone(),
            domain: Domain::Thread,
            title: thread.title.clone(),
            description: thread.content.clone(),
            created_at: thread.created_at,
            relevance_score: score_thread(thread, query, now),
            details: ResultDetails::Thread {
                view_count: thread.view_count,
                comment_count: thread.comment_count,
                pinned: thread.is_pinned,
            },
        })
        .collect();

    let mut events: Vec<SearchResult> = payload
        .events
        .iter()
        .map(|event| SearchResult {
            id: event.id.clone(),
            domain: Domain::Event,
            title: event.title.clone(),
            description: event.description.clone(),
            created_at: event.created_at,
            relevance_score: score_event(event, query, now),
            details: ResultDetails::Event {
                starts_at: event.event_date,
                capacity: event.capacity,
                participants: event.current_participants,
            },
        })
        .collect();

    let mut media: Vec<SearchResult> = payload
        .media
        .iter()
        .map(|item| SearchResult {
            id: item.id.clone(),
            domain: Domain::Media,
            title: item.title.clone(),
            description: item.description.clone(),
            created_at: item.created_at,
            relevance_score: score_media(item, query),
            details: ResultDetails::Media {
                author: item.author.clone(),
                release_year: item.release_year,
                genre: item.genre.clone(),
            },
        })
        .collect();

    sort_by_score(&mut clubs);
    sort_by_score(&mut threads);
    sort_by_score(&mut events);
    sort_by_score(&mut media);

    SearchResponse::new(clubs, threads, events, media)
}
