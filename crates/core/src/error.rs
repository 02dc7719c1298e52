use std::fmt::Display;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// `key` is whatever the entity was looked up by (id, slug or username).
    #[error("Entity not found: {entity} {key}")]
    NotFound { entity: &'static str, key: String },

    /// A single field failed validation; surfaced with field-level detail.
    #[error("Invalid value for '{field}': {message}")]
    InvalidField { field: &'static str, message: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, key: impl Display) -> Self {
        CoreError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        CoreError::InvalidField {
            field,
            message: message.into(),
        }
    }
}
