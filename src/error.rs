//! Custom error types for WhatsFlowing
//!
//! This module defines the error hierarchy for the stage using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for WhatsFlowing operations
#[derive(Error, Debug)]
pub enum WhatsFlowingError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Property validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Expression language evaluation errors
    #[error("Expression error: {0}")]
    Expression(String),

    /// Attribute pattern could not be compiled
    #[error("Invalid attribute pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Journal write errors
    #[error("Journal error: {0}")]
    Journal(String),
}

impl WhatsFlowingError {
    /// Create an invalid pattern error from a regex compilation failure
    pub fn invalid_pattern(pattern: impl Into<String>, err: &regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: err.to_string(),
        }
    }

    /// Check if this error stems from configuration (including bad patterns)
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Validation(_) | Self::InvalidPattern { .. }
        )
    }

    /// Check if this is an expression evaluation error
    pub fn is_expression(&self) -> bool {
        matches!(self, Self::Expression(_))
    }
}

impl From<std::io::Error> for WhatsFlowingError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for WhatsFlowingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for WhatsFlowing operations
pub type WhatsFlowingResult<T> = Result<T, WhatsFlowingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WhatsFlowingError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_invalid_pattern_error() {
        let regex_err = regex::Regex::new("file(").unwrap_err();
        let err = WhatsFlowingError::invalid_pattern("file(", &regex_err);
        assert!(err.to_string().starts_with("Invalid attribute pattern 'file(':"));
        assert!(err.is_config());
        assert!(!err.is_expression());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WhatsFlowingError = io_err.into();
        assert!(matches!(err, WhatsFlowingError::Io(_)));
    }
}
