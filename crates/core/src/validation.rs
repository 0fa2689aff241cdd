//! Client-side validation errors.
//!
//! Everything here is checked before a request is built, so a failure means
//! nothing was sent to the backend.

use thiserror::Error;

use crate::types::PhoneError;

/// A form field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field is empty after trimming.
    #[error("{field} cannot be empty")]
    EmptyField {
        /// Human-readable field name.
        field: &'static str,
    },

    /// A numeric field did not parse.
    #[error("{field} must be a whole number (got {value:?})")]
    NotANumber {
        /// Human-readable field name.
        field: &'static str,
        /// The rejected input.
        value: String,
    },

    /// A numeric field is outside its allowed range.
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        /// Human-readable field name.
        field: &'static str,
        /// The rejected value.
        value: i64,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },

    /// The phone number is malformed.
    #[error("invalid phone number: {0}")]
    Phone(#[from] PhoneError),
}

impl ValidationError {
    /// The field that failed, for display next to the input.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyField { field }
            | Self::NotANumber { field, .. }
            | Self::OutOfRange { field, .. } => field,
            Self::Phone(_) => "phone",
        }
    }
}

/// Trim a required text field, rejecting blank input.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyField`] if the trimmed value is empty.
pub fn required_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(trimmed.to_owned())
}
