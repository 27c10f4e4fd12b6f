//! Shareable-URL codec for query and filters.
//!
//! One-way export plus a tolerant parser: defaults (`type=all`,
//! `sort=relevance`) are omitted so shared links stay canonical, and
//! unknown or malformed parameters are ignored on read.

use url::form_urlencoded;

use super::{DomainFilter, SearchFilters, SortBy, TimeRange};

/// Encodes a query and filters as a URL query string.
///
/// Returns an empty string when everything is default and the query is
/// blank.
#[must_use]
pub fn encode(query: &str, filters: &SearchFilters) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let query = query.trim();
    if !query.is_empty() {
        serializer.append_pair("q", query);
    }
    if filters.domain != DomainFilter::All {
        serializer.append_pair("type", filters.domain.as_str());
    }
    if filters.sort_by != SortBy::Relevance {
        serializer.append_pair("sort", filters.sort_by.as_str());
    }
    if let Some(range) = filters.time_range {
        serializer.append_pair("time", range.as_str());
    }
    serializer.finish()
}

/// Decodes a URL query string into a query and filters.
///
/// Missing or unrecognized parameters fall back to defaults.
#[must_use]
pub fn decode(query_string: &str) -> (String, SearchFilters) {
    let trimmed = query_string.trim_start_matches('?');
    let mut query = String::new();
    let mut filters = SearchFilters::default();

    for (key, value) in form_urlencoded::parse(trimmed.as_bytes()) {
        match key.as_ref() {
            "q" => query = value.trim().to_string(),
            "type" => {
                if let Some(domain) = DomainFilter::parse(&value) {
                    filters.domain = domain;
                }
            }
            "sort" => {
                if let Some(sort_by) = SortBy::parse(&value) {
                    filters.sort_by = sort_by;
                }
            }
            "time" => filters.time_range = TimeRange::parse(&value),
            _ => {}
        }
    }

    (query, filters)
}
