//! Route definitions for the `/titles` resource.
//!
//! Also nests reviews and their comments under
//! `/titles/{title_id}/reviews/...`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{comments, reviews, titles};
use crate::state::AppState;

/// Routes mounted at `/titles`.
///
/// ```text
/// GET    /                                                  -> list
/// POST   /                                                  -> create
/// GET    /{title_id}                                        -> get_by_id
/// PATCH  /{title_id}                                        -> update
/// DELETE /{title_id}                                        -> delete
///
/// GET    /{title_id}/reviews                                -> list
/// POST   /{title_id}/reviews                                -> create
/// GET    /{title_id}/reviews/{review_id}                    -> get_by_id
/// PATCH  /{title_id}/reviews/{review_id}                    -> update
/// DELETE /{title_id}/reviews/{review_id}                    -> delete
///
/// GET    /{title_id}/reviews/{review_id}/comments           -> list
/// POST   /{title_id}/reviews/{review_id}/comments           -> create
/// GET    /{title_id}/reviews/{review_id}/comments/{id}      -> get_by_id
/// PATCH  /{title_id}/reviews/{review_id}/comments/{id}      -> update
/// DELETE /{title_id}/reviews/{review_id}/comments/{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(titles::list).post(titles::create))
        .route(
            "/{title_id}",
            get(titles::get_by_id)
                .patch(titles::update)
                .delete(titles::delete),
        )
        .route(
            "/{title_id}/reviews",
            get(reviews::list).post(reviews::create),
        )
        .route(
            "/{title_id}/reviews/{review_id}",
            get(reviews::get_by_id)
                .patch(reviews::update)
                .delete(reviews::delete),
        )
        .route(
            "/{title_id}/reviews/{review_id}/comments",
            get(comments::list).post(comments::create),
        )
        .route(
            "/{title_id}/reviews/{review_id}/comments/{comment_id}",
            get(comments::get_by_id)
                .patch(comments::update)
                .delete(comments::delete),
        )
}
