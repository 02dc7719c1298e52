//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// `/me` is a static segment and wins over `/{username}`; the reserved
/// username rule keeps them from colliding.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /me            -> me
/// PATCH  /me            -> update_me
/// GET    /{username}    -> get_by_username
/// PATCH  /{username}    -> update
/// DELETE /{username}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route("/me", get(users::me).patch(users::update_me))
        .route(
            "/{username}",
            get(users::get_by_username)
                .patch(users::update)
                .delete(users::delete),
        )
}
