//! Field-level validation errors.

use thiserror::Error;

/// A rejected input field.
///
/// Raised by entity constructors and update methods before any state is
/// touched; carrying the field name lets the API layer report which part
/// of the payload was bad.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed for '{field}': {message}")]
pub struct ValidationError {
    /// The input field that failed validation.
    pub field: &'static str,

    /// Human-readable description of the failure.
    pub message: String,
}

impl ValidationError {
    /// Creates a validation error for the given field.
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Checks that a required text field is not blank.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("price", "must not be negative");
        assert_eq!(
            err.to_string(),
            "Validation failed for 'price': must not be negative"
        );
    }

    #[test]
    fn test_require_text_rejects_whitespace() {
        assert!(require_text("brand", "   ").is_err());
        assert!(require_text("brand", "").is_err());
        assert!(require_text("brand", "Nike").is_ok());
    }
}
