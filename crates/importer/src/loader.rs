//! Per-file CSV loading with row-level failure isolation.

use std::path::Path;

use csv::StringRecord;
use sqlx::PgPool;

use crate::error::{ImportError, RowError};
use crate::rows::ImportRow;

/// Outcome of loading one CSV file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReport {
    pub file: &'static str,
    pub inserted: u64,
    pub skipped: u64,
    /// The file was not present in the import directory.
    pub missing: bool,
}

/// Load every row of `R::FILE` from `dir`, then reset the table's id
/// sequence past the highest imported id.
///
/// Rows are inserted one at a time outside any transaction, so a bad row
/// never takes its neighbours down with it.
pub(crate) async fn load_file<R: ImportRow>(
    pool: &PgPool,
    dir: &Path,
) -> Result<FileReport, ImportError> {
    let mut report = FileReport {
        file: R::FILE,
        ..FileReport::default()
    };

    let path = dir.join(R::FILE);
    if !path.is_file() {
        tracing::warn!(file = R::FILE, "File not found, skipping");
        report.missing = true;
        return Ok(report);
    }

    let csv_error = |source| ImportError::Csv {
        path: path.clone(),
        source,
    };
    let mut reader = csv::Reader::from_path(&path).map_err(csv_error)?;
    let headers = reader.headers().map_err(csv_error)?.clone();

    for record in reader.records() {
        let (line, outcome) = match record {
            Ok(record) => {
                let line = line_of(record.position());
                (line, insert_record::<R>(pool, &record, &headers).await)
            }
            Err(err) => (line_of(err.position()), Err(RowError::Parse(err))),
        };

        match outcome {
            Ok(()) => report.inserted += 1,
            Err(err) => {
                tracing::warn!(file = R::FILE, line, error = %err, "Skipping row");
                report.skipped += 1;
            }
        }
    }

    reset_sequence(pool, R::TABLE).await?;

    tracing::info!(
        file = R::FILE,
        inserted = report.inserted,
        skipped = report.skipped,
        "File imported"
    );
    Ok(report)
}

async fn insert_record<R: ImportRow>(
    pool: &PgPool,
    record: &StringRecord,
    headers: &StringRecord,
) -> Result<(), RowError> {
    let row: R = record.deserialize(Some(headers))?;
    row.validate()?;
    row.insert(pool).await?;
    Ok(())
}

fn line_of(position: Option<&csv::Position>) -> u64 {
    position.map_or(0, csv::Position::line)
}

/// Point the `id` sequence of `table` at `MAX(id) + 1` (or 1 when empty).
async fn reset_sequence(pool: &PgPool, table: &str) -> Result<(), sqlx::Error> {
    let query = format!(
        "SELECT setval(pg_get_serial_sequence('{table}', 'id'), COALESCE(MAX(id), 0) + 1, false) \
         FROM {table}"
    );
    sqlx::query(&query).execute(pool).await?;
    Ok(())
}
