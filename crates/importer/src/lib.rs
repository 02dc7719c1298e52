//! Bulk CSV import for the YaMDb database.
//!
//! Files are loaded in dependency order so that every foreign key points at
//! a row imported earlier:
//!
//! ```text
//! users.csv -> category.csv -> genre.csv -> titles.csv
//!           -> review.csv -> comments.csv -> genre_title.csv
//! ```

use std::path::Path;

use sqlx::PgPool;

pub mod error;
pub mod loader;
pub mod rows;

pub use error::{ImportError, RowError};
pub use loader::FileReport;

use loader::load_file;
use rows::{CategoryRow, CommentRow, GenreRow, GenreTitleRow, ReviewRow, TitleRow, UserRow};

/// Per-file reports, in load order.
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    pub files: Vec<FileReport>,
}

impl ImportSummary {
    pub fn inserted(&self) -> u64 {
        self.files.iter().map(|f| f.inserted).sum()
    }

    pub fn skipped(&self) -> u64 {
        self.files.iter().map(|f| f.skipped).sum()
    }

    /// Report for a single file, e.g. `"titles.csv"`.
    pub fn file(&self, name: &str) -> Option<&FileReport> {
        self.files.iter().find(|f| f.file == name)
    }
}

/// Import every known CSV file found in `dir`.
pub async fn import_dir(pool: &PgPool, dir: &Path) -> Result<ImportSummary, ImportError> {
    if !dir.is_dir() {
        return Err(ImportError::MissingDirectory(dir.to_path_buf()));
    }

    let files = vec![
        load_file::<UserRow>(pool, dir).await?,
        load_file::<CategoryRow>(pool, dir).await?,
        load_file::<GenreRow>(pool, dir).await?,
        load_file::<TitleRow>(pool, dir).await?,
        load_file::<ReviewRow>(pool, dir).await?,
        load_file::<CommentRow>(pool, dir).await?,
        load_file::<GenreTitleRow>(pool, dir).await?,
    ];
    let summary = ImportSummary { files };

    tracing::info!(
        inserted = summary.inserted(),
        skipped = summary.skipped(),
        "Import finished"
    );
    Ok(summary)
}
