use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Load YaMDb content from a directory of CSV files.
#[derive(Parser, Debug)]
#[command(name = "yamdb-import")]
#[command(version)]
struct Args {
    /// Directory containing users.csv, category.csv, genre.csv, titles.csv,
    /// review.csv, comments.csv and genre_title.csv
    dir: PathBuf,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Apply pending migrations before importing
    #[arg(long)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yamdb_importer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    tracing::info!(dir = %args.dir.display(), "Starting import");

    let pool = yamdb_db::create_pool(&args.database_url, 5)
        .await
        .context("Failed to connect to database")?;

    if args.migrate {
        yamdb_db::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;
        tracing::info!("Database migrations applied");
    }

    let summary = yamdb_importer::import_dir(&pool, &args.dir)
        .await
        .with_context(|| format!("Import from {} failed", args.dir.display()))?;

    for report in &summary.files {
        if report.missing {
            tracing::info!(file = report.file, "missing");
        } else {
            tracing::info!(
                file = report.file,
                inserted = report.inserted,
                skipped = report.skipped,
                "done"
            );
        }
    }

    pool.close().await;
    Ok(())
}
