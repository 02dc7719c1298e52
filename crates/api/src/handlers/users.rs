//! Handlers for the `/users` resource.
//!
//! The directory (`/users`, `/users/{username}`) is admin-only for every
//! method. `/users/me` is available to any authenticated user; `role` is
//! read-only there.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use yamdb_core::error::CoreError;
use yamdb_core::roles::Role;
use yamdb_core::validators::{
    username_rule, MAX_EMAIL_LENGTH, MAX_PERSON_NAME_LENGTH, MAX_USERNAME_LENGTH,
};
use yamdb_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use yamdb_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::extract::{Path, Query, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::SearchParams;
use crate::response::Page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(min = 1, max = MAX_USERNAME_LENGTH),
        custom(function = "username_rule")
    )]
    pub username: String,
    #[validate(email, length(max = MAX_EMAIL_LENGTH))]
    pub email: String,
    #[validate(length(max = MAX_PERSON_NAME_LENGTH))]
    pub first_name: Option<String>,
    #[validate(length(max = MAX_PERSON_NAME_LENGTH))]
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<Role>,
}

/// Request body for `PATCH /users/{username}` and `PATCH /users/me`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        length(min = 1, max = MAX_USERNAME_LENGTH),
        custom(function = "username_rule")
    )]
    pub username: Option<String>,
    #[validate(email, length(max = MAX_EMAIL_LENGTH))]
    pub email: Option<String>,
    #[validate(length(max = MAX_PERSON_NAME_LENGTH))]
    pub first_name: Option<String>,
    #[validate(length(max = MAX_PERSON_NAME_LENGTH))]
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<Role>,
}

impl UpdateUserRequest {
    fn into_update(self) -> UpdateUser {
        UpdateUser {
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            bio: self.bio,
            role: self.role,
        }
    }
}

// ---------------------------------------------------------------------------
// Admin directory
// ---------------------------------------------------------------------------

/// GET /api/v1/users
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Page<UserResponse>>> {
    let (limit, offset) = params.bounds();
    let search = params.term();
    let users = UserRepo::list(&state.pool, search, limit, offset).await?;
    let count = UserRepo::count(&state.pool, search).await?;
    Ok(Json(Page::new(
        count,
        users.iter().map(UserResponse::from).collect(),
    )))
}

/// POST /api/v1/users
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let create = CreateUser {
        username: input.username,
        email: input.email,
        first_name: input.first_name.unwrap_or_default(),
        last_name: input.last_name.unwrap_or_default(),
        bio: input.bio.unwrap_or_default(),
        role: input.role.unwrap_or_default(),
    };
    let user = UserRepo::create(&state.pool, &create).await?;

    tracing::info!(
        user_id = user.id,
        username = %user.username,
        created_by = admin.user.id,
        "User created"
    );
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /api/v1/users/{username}
pub async fn get_by_username(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = find_user(&state, &username).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /api/v1/users/{username}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(username): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = find_user(&state, &username).await?;
    let updated = UserRepo::update(&state.pool, user.id, &input.into_update())
        .await?
        .ok_or_else(|| CoreError::not_found("User", &username))?;

    tracing::info!(user_id = updated.id, updated_by = admin.user.id, "User updated");
    Ok(Json(UserResponse::from(&updated)))
}

/// DELETE /api/v1/users/{username}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<StatusCode> {
    let user = find_user(&state, &username).await?;
    UserRepo::delete(&state.pool, user.id).await?;

    tracing::info!(user_id = user.id, deleted_by = admin.user.id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Self profile
// ---------------------------------------------------------------------------

/// GET /api/v1/users/me
pub async fn me(auth: AuthUser) -> AppResult<Json<UserResponse>> {
    Ok(Json(UserResponse::from(&auth.user)))
}

/// PATCH /api/v1/users/me
///
/// Any `role` in the payload is ignored.
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let update = UpdateUser {
        role: None,
        ..input.into_update()
    };
    let updated = UserRepo::update(&state.pool, auth.user.id, &update)
        .await?
        .ok_or_else(|| CoreError::not_found("User", auth.user.id))?;

    tracing::info!(user_id = updated.id, "Profile updated");
    Ok(Json(UserResponse::from(&updated)))
}

async fn find_user(state: &AppState, username: &str) -> AppResult<User> {
    let user = UserRepo::find_by_username(&state.pool, username)
        .await?
        .ok_or_else(|| CoreError::not_found("User", username))?;
    Ok(user)
}
