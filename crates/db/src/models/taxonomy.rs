//! Categories and genres: flat name + slug classifications.
//!
//! Both tables share one shape, so a single [`Taxon`] row type and the
//! [`Taxonomy`] selector serve both.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::types::DbId;

/// Which classification table to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Taxonomy {
    Category,
    Genre,
}

impl Taxonomy {
    pub fn table(self) -> &'static str {
        match self {
            Taxonomy::Category => "categories",
            Taxonomy::Genre => "genres",
        }
    }

    /// Entity name used in error messages.
    pub fn entity(self) -> &'static str {
        match self {
            Taxonomy::Category => "Category",
            Taxonomy::Genre => "Genre",
        }
    }
}

/// A row from `categories` or `genres`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Taxon {
    #[serde(skip)]
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone)]
pub struct CreateTaxon {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTaxon {
    pub name: Option<String>,
    pub slug: Option<String>,
}
