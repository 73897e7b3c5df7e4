//! Common error types for iot-manager.
//!
//! This module provides the error types shared by every crate that parses
//! identifiers or validates request payloads.

use thiserror::Error;

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The identifier is empty.
    #[error("identifier must not be empty")]
    Empty,

    /// The identifier exceeds the maximum length.
    #[error("identifier is longer than {max} characters")]
    TooLong {
        /// Maximum number of characters allowed.
        max: usize,
    },

    /// The identifier contains a character outside the allowed set.
    #[error("invalid character {0:?} in identifier")]
    InvalidCharacter(char),
}

/// A payload failed its own validation rules.
///
/// Every rule is attached to the path of the field it checks, and the path
/// prefixes the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    /// Create a validation error for a named field.
    #[must_use]
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_field() {
        let err = ValidationError::field("connection_string", "too long");
        assert_eq!(err.to_string(), "connection_string: too long");
    }

    #[test]
    fn id_error_messages() {
        assert_eq!(
            IdError::TooLong { max: 128 }.to_string(),
            "identifier is longer than 128 characters"
        );
        assert_eq!(
            IdError::InvalidCharacter('/').to_string(),
            "invalid character '/' in identifier"
        );
    }
}
