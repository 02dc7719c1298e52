//! Limit/offset bounds shared by every list endpoint.
//!
//! A missing limit means [`DEFAULT_PAGE_LIMIT`]; anything outside
//! `1..=MAX_PAGE_LIMIT` is pulled back into range. Negative offsets become 0.

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Normalise raw `?limit=&offset=` values into `(limit, offset)`.
pub fn page_bounds(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit
        .unwrap_or(DEFAULT_PAGE_LIMIT)
        .clamp(1, MAX_PAGE_LIMIT);
    (limit, offset.unwrap_or(0).max(0))
}
