//! Shared helpers for HTTP-level integration tests.
//!
//! Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use yamdb_api::auth::jwt::{issue_access_token, JwtConfig};
use yamdb_api::config::ServerConfig;
use yamdb_api::router::build_app_router;
use yamdb_api::state::AppState;
use yamdb_core::roles::Role;
use yamdb_db::models::user::{CreateUser, User};
use yamdb_db::repositories::UserRepo;
use yamdb_mail::MemoryMailer;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router (same middleware stack as `main.rs`)
/// with an in-memory mailer.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_mailer(pool).0
}

/// Like [`build_test_app`], also returning the mailer so tests can read
/// confirmation codes out of sent mail.
pub fn build_test_app_with_mailer(pool: PgPool) -> (Router, Arc<MemoryMailer>) {
    let config = test_config();
    let mailer = Arc::new(MemoryMailer::new());
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer: mailer.clone(),
    };
    (build_app_router(state, &config), mailer)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user directly and return the row.
pub async fn create_user(pool: &PgPool, username: &str, role: Role) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            role,
            ..Default::default()
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Sign an access token for `user` with the test secret.
pub fn token_for(user: &User) -> String {
    issue_access_token(user.id, &user.username, &test_config().jwt)
        .expect("token generation should succeed")
}

/// Insert a user with `role` and return a bearer token for them.
pub async fn user_token(pool: &PgPool, username: &str, role: Role) -> String {
    let user = create_user(pool, username, role).await;
    token_for(&user)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status code, then return the parsed body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
