//! Error types for analysis-studio
//!
//! This module provides error handling using thiserror for structured
//! error definitions and anyhow for propagation at the binary edge.

use thiserror::Error;

/// Main error type for studio operations
#[derive(Error, Debug)]
pub enum StudioError {
    /// Transport-level failure talking to the analysis backend
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a non-success status
    #[error("Backend returned {status}: {message}")]
    Backend {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// Response body could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration source could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration parsed but holds an unusable value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A spawned background task died before reporting
    #[error("Task failed: {0}")]
    TaskFailed(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for studio operations
pub type Result<T> = std::result::Result<T, StudioError>;

impl From<anyhow::Error> for StudioError {
    fn from(err: anyhow::Error) -> Self {
        StudioError::Other(err.to_string())
    }
}

impl From<serde_json::Error> for StudioError {
    fn from(err: serde_json::Error) -> Self {
        StudioError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = StudioError::Backend {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "Backend returned 502: bad gateway");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.cl");
        let err: StudioError = io.into();
        assert!(matches!(err, StudioError::Io(_)));
        assert!(err.to_string().contains("missing.cl"));
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: StudioError = anyhow::anyhow!("something broke").into();
        assert_eq!(err.to_string(), "something broke");
    }

    #[test]
    fn test_json_error_conversion() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: StudioError = parse.into();
        assert!(matches!(err, StudioError::Serialization(_)));
    }
}
