//! Error handler for roster.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

pub type Result<T> = std::result::Result<T, Error>;

/// Enum representing crate-wide errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] FieldValidationError),

    #[error("JSON (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Crypto(#[from] crate::crypto::CryptoError),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

/// Field of a [`crate::User`] rejected by the validator, with the violated
/// constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid `{field}`: {reason}")]
pub struct FieldValidationError {
    /// JSON name of the offending field.
    pub field: &'static str,
    /// Constraint the field violates.
    pub reason: Reason,
}

impl FieldValidationError {
    /// Create a new [`FieldValidationError`].
    pub fn new(field: &'static str, reason: Reason) -> Self {
        Self { field, reason }
    }
}

/// Constraint violated by a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    /// Value is empty or zero while it is required.
    Missing,
    /// Value does not match the expected format.
    Format,
    /// Value is longer than `max` characters.
    TooLong { max: usize },
    /// Value collides with a reserved word.
    Reserved,
}

impl Reason {
    /// Machine readable code, used as [`ValidationError`] code.
    pub fn code(&self) -> &'static str {
        match self {
            Reason::Missing => "missing",
            Reason::Format => "invalid_format",
            Reason::TooLong { .. } => "too_long",
            Reason::Reserved => "reserved",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Missing => write!(f, "value is required"),
            Reason::Format => write!(f, "value is not well-formatted"),
            Reason::TooLong { max } => {
                write!(f, "value must be at most {max} characters")
            },
            Reason::Reserved => write!(f, "value is reserved"),
        }
    }
}

impl From<FieldValidationError> for ValidationErrors {
    fn from(err: FieldValidationError) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(
            err.field,
            ValidationError::new(err.reason.code())
                .with_message(Cow::Owned(err.reason.to_string())),
        );
        errors
    }
}

/// Client-facing description of a rejected field.
#[derive(Debug, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Flatten [`ValidationErrors`] into a list of [`FieldError`].
pub fn parse_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, issues)| {
            issues.iter().map(move |issue| FieldError {
                field: field.to_string(),
                message: issue
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| issue.code.to_string()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = FieldValidationError::new("email", Reason::TooLong { max: 128 });
        assert_eq!(
            err.to_string(),
            "invalid `email`: value must be at most 128 characters"
        );
    }

    #[test]
    fn test_into_validation_errors() {
        let err = FieldValidationError::new("username", Reason::Reserved);
        let errors: ValidationErrors = err.into();
        let fields = parse_validation_errors(&errors);

        assert_eq!(
            fields,
            vec![FieldError {
                field: "username".into(),
                message: "value is reserved".into(),
            }]
        );
    }
}
