//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the requesting user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires an admin principal.

pub mod auth;
pub mod rbac;
