//! User entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::access::Principal;
use yamdb_core::roles::Role;
use yamdb_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the confirmation code -- NEVER serialize this to API responses.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: String,
    pub confirmation_code: String,
    pub is_superuser: bool,
    pub is_staff: bool,
    pub confirmed_at: Option<Timestamp>,
    pub date_joined: Timestamp,
}

impl User {
    /// Parsed role. The `ck_users_role` constraint keeps the column valid.
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or_default()
    }

    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.id,
            role: self.role(),
            is_superuser: self.is_superuser,
            is_staff: self.is_staff,
        }
    }
}

/// Safe user representation for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            bio: user.bio.clone(),
            role: user.role(),
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Default)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: Role,
}

/// DTO for updating an existing user. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<Role>,
}
