//! Error types for the model monitor

use thiserror::Error;

/// Result type alias for monitor operations
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Main error type for the monitor
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    #[error("Observation {index} is missing field `{field}`")]
    MissingField { index: usize, field: String },

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<polars::error::PolarsError> for MonitorError {
    fn from(err: polars::error::PolarsError) -> Self {
        MonitorError::ParseError(err.to_string())
    }
}

impl From<serde_json::Error> for MonitorError {
    fn from(err: serde_json::Error) -> Self {
        MonitorError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MonitorError::InferenceError("model returned 2 values".to_string());
        assert_eq!(err.to_string(), "Inference error: model returned 2 values");

        let err = MonitorError::MissingField { index: 3, field: "expected".to_string() };
        assert_eq!(err.to_string(), "Observation 3 is missing field `expected`");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MonitorError = io_err.into();
        assert!(matches!(err, MonitorError::IoError(_)));
    }
}
