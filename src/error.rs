//! Unified error handling for the trainlog library.
//!
//! Fix processing itself never fails: noisy input is rejected silently by the
//! noise filter. This error type covers the edges around it: configuration,
//! record storage and export.

use std::fmt;

/// Unified error type for trainlog operations.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "ffi", derive(uniffi::Error))]
pub enum TrackerError {
    /// Configuration value out of range
    ConfigError { field: String, message: String },
    /// Record storage failed
    PersistenceError { message: String },
    /// Writing an export (CSV) failed
    ExportError { message: String },
    /// JSON encoding/decoding failed
    SerializationError { message: String },
    /// Generic internal error
    Internal { message: String },
}

impl TrackerError {
    /// Shorthand for a configuration error on a named field.
    pub fn config(field: &str, message: impl Into<String>) -> Self {
        TrackerError::ConfigError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::ConfigError { field, message } => {
                write!(f, "Configuration error in '{}': {}", field, message)
            }
            TrackerError::PersistenceError { message } => {
                write!(f, "Persistence error: {}", message)
            }
            TrackerError::ExportError { message } => {
                write!(f, "Export error: {}", message)
            }
            TrackerError::SerializationError { message } => {
                write!(f, "Serialization error: {}", message)
            }
            TrackerError::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for TrackerError {}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::SerializationError {
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for TrackerError {
    fn from(err: csv::Error) -> Self {
        TrackerError::ExportError {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        TrackerError::ExportError {
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "persistence")]
impl From<rusqlite::Error> for TrackerError {
    fn from(err: rusqlite::Error) -> Self {
        TrackerError::PersistenceError {
            message: err.to_string(),
        }
    }
}

/// Result type alias for trainlog operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrackerError::config("log_interval_m", "must be positive, got -5");
        assert!(err.to_string().contains("log_interval_m"));
        assert!(err.to_string().contains("must be positive"));
    }

    #[test]
    fn test_json_error_converts() {
        let err: TrackerError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, TrackerError::SerializationError { .. }));
    }
}
