//! Role names and the closed [`Role`] enum.
//!
//! The string constants must match the `CHECK` constraint on `users.role`
//! in `20260301000001_create_users_table.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_USER: &str = "user";
pub const ROLE_MODERATOR: &str = "moderator";
pub const ROLE_ADMIN: &str = "admin";

/// All valid role values.
pub const VALID_ROLES: &[&str] = &[ROLE_USER, ROLE_MODERATOR, ROLE_ADMIN];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => ROLE_USER,
            Role::Moderator => ROLE_MODERATOR,
            Role::Admin => ROLE_ADMIN,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_USER => Ok(Role::User),
            ROLE_MODERATOR => Ok(Role::Moderator),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(CoreError::invalid_field(
                "role",
                format!(
                    "Unknown role '{other}'. Must be one of: {}",
                    VALID_ROLES.join(", ")
                ),
            )),
        }
    }
}
