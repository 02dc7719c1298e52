//! YaMDb domain core.
//!
//! Pure domain logic with no database or HTTP dependencies: field
//! validators, the role model, the access policy evaluated on every
//! mutating request, and confirmation-code generation for the signup flow.

pub mod access;
pub mod confirmation;
pub mod error;
pub mod pagination;
pub mod roles;
pub mod types;
pub mod validators;
