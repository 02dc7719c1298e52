//! Request extractors whose rejections use the JSON error body.
//!
//! axum's own `Json`, `Query` and `Path` reject with a plain-text body. The
//! wrappers here turn those rejections into [`AppError::BadRequest`].

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;
use crate::state::AppState;

/// Like [`Json`], but rejects malformed bodies with a 400 `BAD_REQUEST` and
/// runs [`Validate::validate`] before the handler sees the value.
pub struct ValidatedJson<T>(pub T);

impl<T> FromRequest<AppState> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Query string extractor, e.g. `?year=abc` is a 400 `BAD_REQUEST`.
pub struct Query<T>(pub T);

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Query(value) =
            axum::extract::Query::<T>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Query(value))
    }
}

/// Path parameter extractor, e.g. `/titles/abc` is a 400 `BAD_REQUEST`.
pub struct Path<T>(pub T);

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(value) =
            axum::extract::Path::<T>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Path(value))
    }
}
