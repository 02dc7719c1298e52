use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use yamdb_core::error::CoreError;

/// Field name -> list of messages, rendered as the `fields` key of an error body.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses of
/// the shape `{"error": ..., "code": ..., "fields"?: {...}}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `yamdb_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Request payload failed `validator` rules.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Outgoing mail could not be delivered.
    #[error("Mail error: {0}")]
    Mail(#[from] yamdb_mail::MailError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

struct ErrorParts {
    status: StatusCode,
    code: &'static str,
    message: String,
    fields: Option<FieldErrors>,
}

impl ErrorParts {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            fields: None,
        }
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let parts = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, key } => ErrorParts::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} '{key}' not found"),
                ),
                CoreError::InvalidField { field, message } => ErrorParts {
                    fields: Some(FieldErrors::from([(
                        field.to_string(),
                        vec![message.clone()],
                    )])),
                    ..ErrorParts::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message.clone())
                },
                CoreError::Conflict(msg) => {
                    ErrorParts::new(StatusCode::BAD_REQUEST, "CONFLICT", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    ErrorParts::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => {
                    ErrorParts::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone())
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Request validation ---
            AppError::Validation(errors) => ErrorParts {
                fields: Some(field_errors(errors)),
                ..ErrorParts::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "Validation failed")
            },

            // --- Mail delivery ---
            AppError::Mail(err) => {
                tracing::error!(error = %err, "Mail delivery failed");
                ErrorParts::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MAIL_ERROR",
                    "Failed to send email",
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                ErrorParts::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ErrorParts::internal()
            }
        };

        let mut body = json!({
            "error": parts.message,
            "code": parts.code,
        });
        if let Some(fields) = parts.fields {
            body["fields"] = json!(fields);
        }

        (parts.status, axum::Json(body)).into_response()
    }
}

/// Flatten `validator` errors into field -> messages. Rules without a
/// message fall back to their code.
fn field_errors(errors: &validator::ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", e.code))
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations on `uq_*` constraints map to 400 `CONFLICT`.
/// - Foreign-key violations on `fk_*` constraints map to 400 `BAD_REQUEST`.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    match err {
        sqlx::Error::RowNotFound => {
            ErrorParts::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                // PostgreSQL unique constraint violation
                Some("23505") if constraint.starts_with("uq_") => ErrorParts::new(
                    StatusCode::BAD_REQUEST,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                ),
                // PostgreSQL foreign key violation
                Some("23503") if constraint.starts_with("fk_") => ErrorParts::new(
                    StatusCode::BAD_REQUEST,
                    "BAD_REQUEST",
                    format!("Referenced row does not exist: {constraint}"),
                ),
                _ => {
                    tracing::error!(error = %db_err, "Database error");
                    ErrorParts::internal()
                }
            }
        }
        other => {
            tracing::error!(error = %other, "Database error");
            ErrorParts::internal()
        }
    }
}
