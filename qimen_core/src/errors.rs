//! # Error Types
//!
//! Structured error types for qimen_core. The calendar engine itself is pure
//! arithmetic and never fails; errors only come from rejecting caller input
//! (unparseable dates, out-of-range years) and from loading settings files.
//!
//! ## Example
//!
//! ```rust
//! use qimen_core::errors::{CalcError, CalcResult};
//!
//! fn validate_longitude(longitude: f64) -> CalcResult<()> {
//!     if !(-180.0..=180.0).contains(&longitude) {
//!         return Err(CalcError::InvalidInput {
//!             field: "longitude".to_string(),
//!             value: longitude.to_string(),
//!             reason: "Longitude must be between -180 and 180 degrees".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for qimen_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for chart operations.
///
/// Serializes as `{"type": "...", "details": {...}}` so callers can pass it
/// through to a display layer unchanged.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (unparseable, out of range, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Settings file I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("date", "2024-13-01", "Month out of range");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("date").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::serialization("eof").error_code(), "SERIALIZATION_ERROR");
        assert_eq!(CalcError::file_error("read", "x.json", "not found").error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_display_message() {
        let error = CalcError::invalid_input("longitude", "200", "out of range");
        assert_eq!(error.to_string(), "Invalid input for 'longitude': 200 - out of range");
    }
}
