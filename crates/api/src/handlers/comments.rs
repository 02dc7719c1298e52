//! Handlers for `/titles/{title_id}/reviews/{review_id}/comments`.
//!
//! The parent review must belong to the title in the path; otherwise every
//! operation answers 404.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use yamdb_core::access::{authorize, Operation, Resource};
use yamdb_core::error::CoreError;
use yamdb_core::types::DbId;
use yamdb_db::models::comment::{Comment, CreateComment};
use yamdb_db::repositories::CommentRepo;
use yamdb_db::DbPool;

use super::reviews::find_review;
use crate::error::AppResult;
use crate::extract::{Path, Query, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::query::SearchParams;
use crate::response::Page;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1))]
    pub text: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1))]
    pub text: Option<String>,
}

/// GET .../comments?search=
pub async fn list(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Page<Comment>>> {
    find_review(&state.pool, title_id, review_id).await?;
    let (limit, offset) = params.bounds();
    let search = params.term();
    let comments =
        CommentRepo::list_for_review(&state.pool, review_id, search, limit, offset).await?;
    let count = CommentRepo::count_for_review(&state.pool, review_id, search).await?;
    Ok(Json(Page::new(count, comments)))
}

/// POST .../comments
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    ValidatedJson(input): ValidatedJson<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    authorize(Some(&auth.principal), Operation::Write, Resource::NewAuthored)?;
    let review = find_review(&state.pool, title_id, review_id).await?;

    let comment = CommentRepo::create(
        &state.pool,
        &CreateComment {
            review_id: review.id,
            author_id: auth.user.id,
            text: input.text,
        },
    )
    .await?;

    tracing::info!(comment_id = comment.id, review_id, user_id = auth.user.id, "Comment created");
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET .../comments/{comment_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<Json<Comment>> {
    Ok(Json(
        find_comment(&state.pool, title_id, review_id, comment_id).await?,
    ))
}

/// PATCH .../comments/{comment_id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
    ValidatedJson(input): ValidatedJson<UpdateCommentRequest>,
) -> AppResult<Json<Comment>> {
    let comment = find_comment(&state.pool, title_id, review_id, comment_id).await?;
    authorize(
        Some(&auth.principal),
        Operation::Write,
        Resource::Authored {
            author_id: comment.author_id,
        },
    )?;

    let updated = CommentRepo::update(&state.pool, comment.id, input.text.as_deref())
        .await?
        .ok_or_else(|| CoreError::not_found("Comment", comment_id))?;

    tracing::info!(comment_id, user_id = auth.user.id, "Comment updated");
    Ok(Json(updated))
}

/// DELETE .../comments/{comment_id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<StatusCode> {
    let comment = find_comment(&state.pool, title_id, review_id, comment_id).await?;
    authorize(
        Some(&auth.principal),
        Operation::Write,
        Resource::Authored {
            author_id: comment.author_id,
        },
    )?;

    CommentRepo::delete(&state.pool, comment.id).await?;

    tracing::info!(comment_id, user_id = auth.user.id, "Comment deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn find_comment(
    pool: &DbPool,
    title_id: DbId,
    review_id: DbId,
    comment_id: DbId,
) -> AppResult<Comment> {
    find_review(pool, title_id, review_id).await?;
    let comment = CommentRepo::find_in_review(pool, review_id, comment_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Comment", comment_id))?;
    Ok(comment)
}
