//! Role-based access control extractors.
//!
//! Wraps [`AuthUser`] and rejects requests whose principal is not an admin.
//! Object-level rules (authorship, moderators) are evaluated in handlers via
//! [`yamdb_core::access::authorize`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use yamdb_core::access::require_admin;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires an admin (by role, or by the superuser/staff flags).
/// Rejects with 401 when unauthenticated and 403 otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(admin): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        require_admin(&user.principal)?;
        Ok(RequireAdmin(user))
    }
}
