//! Error types for the Dst pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, DstError>;

/// Main error type for the Dst pipeline
#[derive(Error, Debug)]
pub enum DstError {
    /// Malformed timestamp or value on an otherwise well-formed data line.
    /// Fatal for the stream: skipping would corrupt gap-fill accounting.
    #[error("Parse error on line {line}: {reason}")]
    ParseError { line: usize, reason: String },

    /// Requested window extends past the end of the section's data.
    #[error("Boundary error in {op}: index {index} requires {required} samples, section has {available}")]
    BoundaryError {
        op: &'static str,
        index: usize,
        required: usize,
        available: usize,
    },

    #[error("Data error: {0}")]
    DataError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<polars::error::PolarsError> for DstError {
    fn from(err: polars::error::PolarsError) -> Self {
        DstError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for DstError {
    fn from(err: serde_json::Error) -> Self {
        DstError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DstError::ParseError {
            line: 12,
            reason: "bad timestamp".to_string(),
        };
        assert_eq!(err.to_string(), "Parse error on line 12: bad timestamp");
    }

    #[test]
    fn test_boundary_display_names_parameters() {
        let err = DstError::BoundaryError {
            op: "predict_windows",
            index: 5,
            required: 70,
            available: 60,
        };
        let msg = err.to_string();
        assert!(msg.contains("predict_windows"));
        assert!(msg.contains("index 5"));
        assert!(msg.contains("70"));
        assert!(msg.contains("60"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DstError = io_err.into();
        assert!(matches!(err, DstError::IoError(_)));
    }
}
