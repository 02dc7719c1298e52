//! Handlers for `/titles/{title_id}/reviews`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use yamdb_core::access::{authorize, Operation, Resource};
use yamdb_core::error::CoreError;
use yamdb_core::types::DbId;
use yamdb_core::validators::score_rule;
use yamdb_db::models::review::{CreateReview, Review, UpdateReview};
use yamdb_db::repositories::{ReviewRepo, TitleRepo};
use yamdb_db::DbPool;

use crate::error::AppResult;
use crate::extract::{Path, Query, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::query::SearchParams;
use crate::response::Page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(custom(function = "score_rule"))]
    pub score: i16,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(length(min = 1))]
    pub text: Option<String>,
    #[validate(custom(function = "score_rule"))]
    pub score: Option<i16>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/titles/{title_id}/reviews?search=
pub async fn list(
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Page<Review>>> {
    ensure_title(&state.pool, title_id).await?;
    let (limit, offset) = params.bounds();
    let search = params.term();
    let reviews =
        ReviewRepo::list_for_title(&state.pool, title_id, search, limit, offset).await?;
    let count = ReviewRepo::count_for_title(&state.pool, title_id, search).await?;
    Ok(Json(Page::new(count, reviews)))
}

/// POST /api/v1/titles/{title_id}/reviews
///
/// One review per (author, title), also enforced by `uq_reviews_author_title`.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<Review>)> {
    authorize(Some(&auth.principal), Operation::Write, Resource::NewAuthored)?;
    ensure_title(&state.pool, title_id).await?;

    if ReviewRepo::exists_for_author(&state.pool, title_id, auth.user.id).await? {
        return Err(CoreError::Conflict(
            "A user may write only one review per title".into(),
        )
        .into());
    }

    let review = ReviewRepo::create(
        &state.pool,
        &CreateReview {
            title_id,
            author_id: auth.user.id,
            text: input.text,
            score: input.score,
        },
    )
    .await?;

    tracing::info!(review_id = review.id, title_id, user_id = auth.user.id, "Review created");
    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Review>> {
    Ok(Json(find_review(&state.pool, title_id, review_id).await?))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    ValidatedJson(input): ValidatedJson<UpdateReviewRequest>,
) -> AppResult<Json<Review>> {
    let review = find_review(&state.pool, title_id, review_id).await?;
    authorize(
        Some(&auth.principal),
        Operation::Write,
        Resource::Authored {
            author_id: review.author_id,
        },
    )?;

    let updated = ReviewRepo::update(
        &state.pool,
        review.id,
        &UpdateReview {
            text: input.text,
            score: input.score,
        },
    )
    .await?
    .ok_or_else(|| CoreError::not_found("Review", review_id))?;

    tracing::info!(review_id, user_id = auth.user.id, "Review updated");
    Ok(Json(updated))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let review = find_review(&state.pool, title_id, review_id).await?;
    authorize(
        Some(&auth.principal),
        Operation::Write,
        Resource::Authored {
            author_id: review.author_id,
        },
    )?;

    ReviewRepo::delete(&state.pool, review.id).await?;

    tracing::info!(review_id, user_id = auth.user.id, "Review deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) async fn ensure_title(pool: &DbPool, title_id: DbId) -> AppResult<()> {
    TitleRepo::find_by_id(pool, title_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Title", title_id))?;
    Ok(())
}

pub(crate) async fn find_review(
    pool: &DbPool,
    title_id: DbId,
    review_id: DbId,
) -> AppResult<Review> {
    ensure_title(pool, title_id).await?;
    let review = ReviewRepo::find_in_title(pool, title_id, review_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Review", review_id))?;
    Ok(review)
}
