//! Title entity model, read model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::types::DbId;

use super::taxonomy::Taxon;

/// A row from the `titles` table.
#[derive(Debug, Clone, FromRow)]
pub struct Title {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
}

/// Title joined with its category and the aggregated review score.
///
/// `rating` is `None` when the title has no reviews yet.
#[derive(Debug, Clone, FromRow)]
pub struct TitleRatingRow {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
}

/// One genre link, keyed by the title it belongs to.
#[derive(Debug, Clone, FromRow)]
pub struct TitleGenreRow {
    pub title_id: DbId,
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

/// Title as returned by the API: nested category and genres plus rating.
#[derive(Debug, Clone, Serialize)]
pub struct TitleDetail {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub genre: Vec<Taxon>,
    pub category: Option<Taxon>,
}

impl TitleDetail {
    pub fn from_row(row: TitleRatingRow, genre: Vec<Taxon>) -> Self {
        let category = match (row.category_id, row.category_name, row.category_slug) {
            (Some(id), Some(name), Some(slug)) => Some(Taxon { id, name, slug }),
            _ => None,
        };
        Self {
            id: row.id,
            name: row.name,
            year: row.year,
            rating: row.rating,
            description: row.description,
            genre,
            category,
        }
    }
}

/// DTO for creating a title. Category and genres are already resolved to ids.
#[derive(Debug, Clone)]
pub struct CreateTitle {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub genre_ids: Vec<DbId>,
}

/// DTO for partially updating a title.
///
/// `genre_ids: Some(..)` replaces the whole genre set. For the nullable
/// columns, `Some(None)` clears the value and `None` leaves it alone.
#[derive(Debug, Clone, Default)]
pub struct UpdateTitle {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<Option<String>>,
    pub category_id: Option<Option<DbId>>,
    pub genre_ids: Option<Vec<DbId>>,
}

/// Listing filters. All present filters must match.
#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    /// Category slug (exact).
    pub category: Option<String>,
    /// Genre slug (exact).
    pub genre: Option<String>,
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    /// Release year (exact).
    pub year: Option<i32>,
}
