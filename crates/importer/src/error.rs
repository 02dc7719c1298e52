use std::path::PathBuf;

/// Failures that abort a whole file or the whole import.
///
/// Per-row problems never surface here: they are logged and counted as
/// skipped by the loader.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Import directory {0} does not exist")]
    MissingDirectory(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Why a single row was skipped.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    #[error("unreadable row: {0}")]
    Parse(#[from] csv::Error),

    #[error("invalid row: {0}")]
    Invalid(#[from] yamdb_core::error::CoreError),

    #[error("insert failed: {0}")]
    Insert(#[from] sqlx::Error),
}
