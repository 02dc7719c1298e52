//! Field validators shared by the API and importer layers.
//!
//! Each `validate_*` function returns [`CoreError::InvalidField`] on failure.
//! The `*_rule` variants adapt them to the `validator` crate's
//! `#[validate(custom(function = ...))]` attribute so request DTOs report
//! failures with field-level detail.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;
use validator::ValidationError;

use crate::error::CoreError;

/// Username reserved for the self-profile endpoint (`/users/me`).
pub const RESERVED_USERNAME: &str = "me";

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: u64 = 150;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: u64 = 254;

/// Maximum length for first/last name.
pub const MAX_PERSON_NAME_LENGTH: u64 = 150;

/// Maximum length for category/genre names.
pub const MAX_NAME_LENGTH: u64 = 256;

/// Maximum slug length.
pub const MAX_SLUG_LENGTH: usize = 50;

pub const MIN_SCORE: i16 = 1;
pub const MAX_SCORE: i16 = 10;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid regex"));

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid regex"));

/// Reject the reserved name `me` and anything outside `[\w.@+-]`.
pub fn validate_username(value: &str) -> Result<(), CoreError> {
    if value == RESERVED_USERNAME {
        return Err(CoreError::invalid_field(
            "username",
            format!("Using \"{RESERVED_USERNAME}\" as a username is not allowed"),
        ));
    }
    if !USERNAME_RE.is_match(value) {
        return Err(CoreError::invalid_field(
            "username",
            format!("Username '{value}' contains forbidden characters"),
        ));
    }
    Ok(())
}

/// Reject release years later than the current calendar year.
pub fn validate_year(value: i32) -> Result<(), CoreError> {
    validate_year_against(value, chrono::Utc::now().year())
}

/// Same as [`validate_year`] with an explicit reference year.
pub fn validate_year_against(value: i32, current_year: i32) -> Result<(), CoreError> {
    if value > current_year {
        return Err(CoreError::invalid_field(
            "year",
            format!("Year {value} is later than the current year ({current_year})"),
        ));
    }
    Ok(())
}

pub fn validate_score(value: i16) -> Result<(), CoreError> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
        return Err(CoreError::invalid_field(
            "score",
            format!("Score must be between {MIN_SCORE} and {MAX_SCORE}, got {value}"),
        ));
    }
    Ok(())
}

pub fn validate_slug(value: &str) -> Result<(), CoreError> {
    if value.len() > MAX_SLUG_LENGTH {
        return Err(CoreError::invalid_field(
            "slug",
            format!("Slug must be at most {MAX_SLUG_LENGTH} characters"),
        ));
    }
    if !SLUG_RE.is_match(value) {
        return Err(CoreError::invalid_field(
            "slug",
            format!("Slug '{value}' may only contain letters, digits, '-' and '_'"),
        ));
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Adapters for `#[validate(custom(function = ...))]`
-------------------------------------------------------------------------- */

pub fn username_rule(value: &str) -> Result<(), ValidationError> {
    validate_username(value).map_err(|e| to_validation_error("username", e))
}

pub fn year_rule(value: i32) -> Result<(), ValidationError> {
    validate_year(value).map_err(|e| to_validation_error("year", e))
}

pub fn score_rule(value: i16) -> Result<(), ValidationError> {
    validate_score(value).map_err(|e| to_validation_error("score", e))
}

pub fn slug_rule(value: &str) -> Result<(), ValidationError> {
    validate_slug(value).map_err(|e| to_validation_error("slug", e))
}

fn to_validation_error(code: &'static str, err: CoreError) -> ValidationError {
    let message = match err {
        CoreError::InvalidField { message, .. } => message,
        other => other.to_string(),
    };
    ValidationError::new(code).with_message(Cow::Owned(message))
}
