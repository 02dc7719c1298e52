//! Route definitions shared by `/categories` and `/genres`.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::taxonomy::{self, TaxonomyKind};
use crate::state::AppState;

/// Routes mounted at `/categories` or `/genres`.
///
/// ```text
/// GET    /          -> list
/// POST   /          -> create
/// PATCH  /{slug}    -> update
/// DELETE /{slug}    -> delete
/// ```
pub fn router<K: TaxonomyKind>() -> Router<AppState> {
    Router::new()
        .route("/", get(taxonomy::list::<K>).post(taxonomy::create::<K>))
        .route(
            "/{slug}",
            patch(taxonomy::update::<K>).delete(taxonomy::delete::<K>),
        )
}
