//! Listing query parsing and page shaping.
//!
//! Query parameters are parsed leniently: anything unparsable or out of
//! range silently falls back to the default instead of producing a 400.

use serde::{Deserialize, Serialize};

use crate::upstream::PokemonListResponse;

pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 100;
pub const DEFAULT_PAGE: u32 = 1;

/// Parse the leading integer of `raw`, the way a browser's `parseInt` does.
///
/// Leading whitespace and a sign are accepted, then the longest run of
/// ASCII digits; anything after it is ignored. Returns `None` when no
/// digit follows or the value does not fit in an `i64`.
#[must_use]
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() {
        return None;
    }
    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Effective `limit`, `page` and derived `offset` of a listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub limit: u32,
    pub offset: u64,
}

impl PageWindow {
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            offset: u64::from(page.saturating_sub(1)) * u64::from(limit),
        }
    }

    /// Build the window from a raw query string (`limit=..&page=..`).
    #[must_use]
    pub fn from_query(query: Option<&str>) -> Self {
        let mut limit_param = None;
        let mut page_param = None;
        for (key, value) in url::form_urlencoded::parse(query.unwrap_or("").as_bytes()) {
            match key.as_ref() {
                "limit" if limit_param.is_none() => limit_param = Some(value.into_owned()),
                "page" if page_param.is_none() => page_param = Some(value.into_owned()),
                _ => {}
            }
        }

        let limit = limit_param
            .as_deref()
            .and_then(parse_leading_int)
            .and_then(|v| u32::try_from(v).ok())
            .filter(|v| (1..=MAX_LIMIT).contains(v));
        let page = page_param
            .as_deref()
            .and_then(parse_leading_int)
            .and_then(|v| u32::try_from(v).ok())
            .filter(|v| *v >= 1);

        if limit.is_none() && limit_param.is_some() {
            tracing::debug!(limit = ?limit_param, "invalid limit, using default");
        }
        if page.is_none() && page_param.is_some() {
            tracing::debug!(page = ?page_param, "invalid page, using default");
        }

        Self::new(page.unwrap_or(DEFAULT_PAGE), limit.unwrap_or(DEFAULT_LIMIT))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonSummary {
    pub name: String,
    pub id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonListPage {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub results: Vec<PokemonSummary>,
}

/// Id taken from the last non-empty path segment of a resource URL.
///
/// Falls back to the entry's position (`offset + index + 1`) when that
/// segment does not start with a positive integer.
#[must_use]
pub fn derive_id(resource_url: &str, offset: u64, index: usize) -> u64 {
    resource_url
        .split('/')
        .filter(|s| !s.is_empty())
        .next_back()
        .and_then(parse_leading_int)
        .and_then(|v| u64::try_from(v).ok())
        .filter(|v| *v > 0)
        .unwrap_or_else(|| offset + index as u64 + 1)
}

fn is_present(link: Option<&str>) -> bool {
    link.is_some_and(|l| !l.is_empty())
}

impl PokemonListPage {
    #[must_use]
    pub fn from_upstream(window: PageWindow, upstream: PokemonListResponse) -> Self {
        let results = upstream
            .results
            .into_iter()
            .enumerate()
            .map(|(index, entry)| PokemonSummary {
                id: derive_id(&entry.url, window.offset, index),
                name: entry.name,
            })
            .collect();

        Self {
            page: window.page,
            limit: window.limit,
            total: upstream.count,
            has_next_page: is_present(upstream.next.as_deref()),
            has_prev_page: is_present(upstream.previous.as_deref()),
            results,
        }
    }
}
