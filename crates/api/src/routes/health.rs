//! Liveness check for load balancers, mounted at `/health` outside the
//! versioned API.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `ok`, or `degraded` while Postgres is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

impl HealthReport {
    fn new(db_healthy: bool) -> Self {
        Self {
            status: if db_healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        }
    }
}

/// Always answers 200 so the process stays in rotation; callers read
/// `db_healthy` for the database.
async fn report(State(state): State<AppState>) -> Json<HealthReport> {
    let db_healthy = match yamdb_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Health check could not reach the database");
            false
        }
    };
    Json(HealthReport::new(db_healthy))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(report))
}
