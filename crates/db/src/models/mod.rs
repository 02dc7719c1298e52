//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Read models joined with related rows where the API needs them
//! - Create / update DTOs consumed by the repositories

pub mod comment;
pub mod review;
pub mod taxonomy;
pub mod title;
pub mod user;
