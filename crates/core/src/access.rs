//! Access policy for API resources.
//!
//! Authorization is a pure function of who is asking ([`Principal`]), what
//! they want to do ([`Operation`]) and what they are touching ([`Resource`]).
//! Rules in precedence order:
//!
//! 1. Reads are always allowed, for anyone.
//! 2. Writes require an authenticated principal (else `Unauthorized`).
//! 3. Writes to reviews and comments require the author, a moderator or an
//!    admin (else `Forbidden`).
//! 4. Writes to categories, genres and titles require an admin (else
//!    `Forbidden`).
//!
//! The user directory sits outside these rules: see [`require_admin`].

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// Identity of an authenticated requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: DbId,
    pub role: Role,
    pub is_superuser: bool,
    pub is_staff: bool,
}

impl Principal {
    /// Admin by role, or by the superuser/staff flags.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin || self.is_superuser || self.is_staff
    }

    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }
}

/// Whether a request only reads or also mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// GET / HEAD / OPTIONS.
    Read,
    /// POST / PUT / PATCH / DELETE.
    Write,
}

/// The thing a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Categories, genres and titles.
    Catalog,
    /// A new review or comment not yet owned by anyone.
    NewAuthored,
    /// An existing review or comment written by `author_id`.
    Authored { author_id: DbId },
}

/// Evaluate the access policy. `principal` is `None` for anonymous requests.
pub fn authorize(
    principal: Option<&Principal>,
    operation: Operation,
    resource: Resource,
) -> Result<(), CoreError> {
    if operation == Operation::Read {
        return Ok(());
    }

    let principal = principal.ok_or_else(|| {
        CoreError::Unauthorized("Authentication credentials were not provided".into())
    })?;

    match resource {
        Resource::NewAuthored => Ok(()),
        Resource::Authored { author_id } => {
            if principal.user_id == author_id || principal.is_moderator() || principal.is_admin()
            {
                Ok(())
            } else {
                Err(CoreError::Forbidden(
                    "Only the author, a moderator or an admin may modify this object".into(),
                ))
            }
        }
        Resource::Catalog => {
            if principal.is_admin() {
                Ok(())
            } else {
                Err(CoreError::Forbidden("Admin role required".into()))
            }
        }
    }
}

/// Gate for the user directory, which is admin-only for every method.
pub fn require_admin(principal: &Principal) -> Result<(), CoreError> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(CoreError::Forbidden("Admin role required".into()))
    }
}
