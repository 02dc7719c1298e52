//! Handlers for the `/auth` resource (signup, token).
//!
//! Signup is passwordless: a confirmation code is emailed on every signup
//! and exchanged for an access token.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;
use yamdb_core::confirmation::{
    code_matches, confirmation_email_body, generate_confirmation_code, CONFIRMATION_CODE_LENGTH,
    CONFIRMATION_EMAIL_SUBJECT,
};
use yamdb_core::error::CoreError;
use yamdb_core::validators::{username_rule, MAX_EMAIL_LENGTH, MAX_USERNAME_LENGTH};
use yamdb_db::models::user::{CreateUser, User};
use yamdb_db::repositories::UserRepo;

use crate::auth::jwt::issue_access_token;
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::state::AppState;

/// Upper bound on a submitted confirmation code, in `validator`'s length type.
const MAX_CODE_LENGTH: u64 = CONFIRMATION_CODE_LENGTH as u64;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`. Echoed back on success.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct SignupRequest {
    #[validate(email, length(max = MAX_EMAIL_LENGTH))]
    pub email: String,
    #[validate(
        length(min = 1, max = MAX_USERNAME_LENGTH),
        custom(function = "username_rule")
    )]
    pub username: String,
}

/// Request body for `POST /auth/token`.
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(
        length(min = 1, max = MAX_USERNAME_LENGTH),
        custom(function = "username_rule")
    )]
    pub username: String,
    #[validate(length(min = 1, max = MAX_CODE_LENGTH))]
    pub confirmation_code: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Register (or re-register) a user and email them a fresh confirmation
/// code. A username or email already bound to a different account is a
/// conflict.
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignupRequest>,
) -> AppResult<Json<SignupRequest>> {
    let user = resolve_signup_user(&state, &input).await?;

    let code = generate_confirmation_code();
    UserRepo::set_confirmation_code(&state.pool, user.id, &code).await?;

    state
        .mailer
        .send(
            &user.email,
            CONFIRMATION_EMAIL_SUBJECT,
            &confirmation_email_body(&code),
        )
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Confirmation code sent");
    Ok(Json(input))
}

/// POST /api/v1/auth/token
///
/// Exchange a username + confirmation code for an access token.
pub async fn token(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<TokenRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| CoreError::not_found("User", &input.username))?;

    if !code_matches(&user.confirmation_code, &input.confirmation_code) {
        return Err(AppError::BadRequest("Invalid confirmation code".into()));
    }

    let token = issue_access_token(user.id, &user.username, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    UserRepo::mark_confirmed(&state.pool, user.id).await?;

    tracing::info!(user_id = user.id, "Access token issued");
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Find the account matching both username and email, or create it when
/// neither is taken.
async fn resolve_signup_user(state: &AppState, input: &SignupRequest) -> AppResult<User> {
    let by_username = UserRepo::find_by_username(&state.pool, &input.username).await?;
    let by_email = UserRepo::find_by_email(&state.pool, &input.email).await?;

    match (by_username, by_email) {
        (Some(user), Some(other)) if user.id == other.id => Ok(user),
        (Some(_), _) => Err(CoreError::Conflict(format!(
            "Username '{}' is already registered with a different email",
            input.username
        ))
        .into()),
        (None, Some(_)) => Err(CoreError::Conflict(format!(
            "Email '{}' is already registered with a different username",
            input.email
        ))
        .into()),
        (None, None) => {
            let user = UserRepo::create(
                &state.pool,
                &CreateUser {
                    username: input.username.clone(),
                    email: input.email.clone(),
                    ..Default::default()
                },
            )
            .await?;
            tracing::info!(user_id = user.id, username = %user.username, "User signed up");
            Ok(user)
        }
    }
}
