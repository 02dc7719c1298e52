pub mod auth;
pub mod health;
pub mod taxonomy;
pub mod titles;
pub mod users;

use axum::Router;

use crate::handlers::taxonomy::{Categories, Genres};
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                                     signup (public)
/// /auth/token                                      token exchange (public)
///
/// /users                                           list, create (admin only)
/// /users/me                                        get, patch own profile
/// /users/{username}                                get, patch, delete (admin only)
///
/// /categories                                      list, create
/// /categories/{slug}                               patch, delete
/// /genres                                          list, create
/// /genres/{slug}                                   patch, delete
///
/// /titles                                          list (filters), create
/// /titles/{title_id}                               get, patch, delete
/// /titles/{title_id}/reviews                       list, create
/// /titles/{title_id}/reviews/{review_id}           get, patch, delete
/// /titles/{title_id}/reviews/{review_id}/comments  list, create
/// /titles/{title_id}/reviews/{review_id}/comments/{comment_id}
///                                                  get, patch, delete
/// ```
///
/// Reads are public everywhere except `/users`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Signup and token exchange.
        .nest("/auth", auth::router())
        // User directory and self profile.
        .nest("/users", users::router())
        // Classifications.
        .nest("/categories", taxonomy::router::<Categories>())
        .nest("/genres", taxonomy::router::<Genres>())
        // Titles with nested reviews and comments.
        .nest("/titles", titles::router())
}
