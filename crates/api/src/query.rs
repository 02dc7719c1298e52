//! Shared query parameter types for API handlers.

use serde::Deserialize;
use yamdb_core::pagination::page_bounds;
use yamdb_db::models::title::TitleFilter;

/// `?search=&limit=&offset=`, used by every list except titles.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl SearchParams {
    /// The search term, treating an empty string as absent.
    pub fn term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    /// Clamped `(limit, offset)` ready for a repository call.
    pub fn bounds(&self) -> (i64, i64) {
        page_bounds(self.limit, self.offset)
    }
}

/// Title listing filters (`?category=&genre=&name=&year=`) plus pagination.
#[derive(Debug, Default, Deserialize)]
pub struct TitleListParams {
    pub category: Option<String>,
    pub genre: Option<String>,
    pub name: Option<String>,
    pub year: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl TitleListParams {
    pub fn filter(&self) -> TitleFilter {
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        TitleFilter {
            category: non_empty(&self.category),
            genre: non_empty(&self.genre),
            name: non_empty(&self.name),
            year: self.year,
        }
    }

    pub fn bounds(&self) -> (i64, i64) {
        page_bounds(self.limit, self.offset)
    }
}
