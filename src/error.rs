//! Custom error types for Bookkeeper
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for Bookkeeper operations
#[derive(Error, Debug)]
pub enum BookkeeperError {
    /// A record that already carries an identity was passed to `add`
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Validation errors for user input and data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// A filter referenced a field the record type does not declare
    #[error("Unknown field '{field}' for table '{table}'")]
    UnknownField { table: &'static str, field: String },

    /// SQLite errors
    #[error("Database error: {0}")]
    Database(String),

    /// Storage errors (lock poisoning, row materialization)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl BookkeeperError {
    /// Create a "not found" error for a stored record identity
    pub fn record_not_found(entity_type: &'static str, pk: i64) -> Self {
        Self::NotFound {
            entity_type,
            identifier: pk.to_string(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an invalid state error
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for BookkeeperError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BookkeeperError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<rusqlite::Error> for BookkeeperError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Result type alias for Bookkeeper operations
pub type BookkeeperResult<T> = Result<T, BookkeeperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BookkeeperError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = BookkeeperError::record_not_found("Expense", 42);
        assert_eq!(err.to_string(), "Expense not found: 42");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_unknown_field_error() {
        let err = BookkeeperError::UnknownField {
            table: "expense",
            field: "colour".into(),
        };
        assert_eq!(err.to_string(), "Unknown field 'colour' for table 'expense'");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BookkeeperError = io_err.into();
        assert!(matches!(err, BookkeeperError::Io(_)));
    }

    #[test]
    fn test_from_sqlite_error() {
        let err: BookkeeperError = rusqlite::Error::InvalidQuery.into();
        assert!(matches!(err, BookkeeperError::Database(_)));
    }
}
