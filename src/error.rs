//! Error types for the water_scan library
//!
//! Conversion, estimation and interpretation are total functions and never
//! produce these errors. Everything fallible lives at the I/O boundary:
//! configuration files, calibration fitting and the scan log backend.

use thiserror::Error;

/// Result type alias for water_scan operations
pub type Result<T> = std::result::Result<T, ScanError>;

/// Error types for scan log persistence, configuration and calibration
#[derive(Error, Debug)]
pub enum ScanError {
    /// Persisted scan log could not be read
    #[error("Failed to read scan log: {message}")]
    StorageRead {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Persisting the scan log failed; previously stored data is untouched
    #[error("Failed to write scan log: {message}")]
    StorageWrite {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON encoding or decoding failed
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file could not be loaded or saved
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// A calibration model could not be fitted from the given samples
    #[error("Calibration failed: {reason}")]
    Calibration { reason: String },
}

impl ScanError {
    /// Create a storage read error with context
    pub fn storage_read<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::StorageRead {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a storage write error with context
    pub fn storage_write<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::StorageWrite {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a serialization error with context
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Check if this error indicates a condition the caller may retry
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScanError::StorageRead { .. } | ScanError::StorageWrite { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            ScanError::StorageWrite { .. } => {
                "The scan could not be saved. Your previous scans are safe; please try again.".to_string()
            }
            ScanError::StorageRead { .. } => {
                "Saved scans could not be read. Please try again.".to_string()
            }
            ScanError::Config { .. } => {
                "The settings file could not be loaded. Please check its contents.".to_string()
            }
            ScanError::Calibration { reason } => {
                format!("Calibration could not be computed: {}", reason)
            }
            _ => "Something went wrong while processing the scan.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_write_errors_are_recoverable() {
        let err = ScanError::storage_write("disk full", io::Error::new(io::ErrorKind::Other, "ENOSPC"));
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_parameter_errors_are_not_recoverable() {
        let err = ScanError::invalid_parameter("weights.clarity", -1.0);
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "Invalid parameter: weights.clarity = -1");
    }

    #[test]
    fn test_user_message_for_calibration() {
        let err = ScanError::Calibration {
            reason: "need at least 4 labelled samples".to_string(),
        };
        assert!(err.user_message().contains("at least 4"));
    }
}
