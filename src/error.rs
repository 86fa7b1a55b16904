//! Error types for the construction cost estimator

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for estimator operations
pub type Result<T> = std::result::Result<T, CostError>;

/// Main error type for the estimator
#[derive(Error, Debug)]
pub enum CostError {
    #[error("Dataset not found: {}", .0.display())]
    DatasetNotFound(PathBuf),

    #[error("Model artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Computation error: {0}")]
    ComputationError(String),
}

impl CostError {
    /// Whether this is one of the two anticipated "file is missing" aborts
    pub fn is_missing_input(&self) -> bool {
        matches!(self, CostError::DatasetNotFound(_) | CostError::ArtifactNotFound(_))
    }
}

impl From<polars::error::PolarsError> for CostError {
    fn from(err: polars::error::PolarsError) -> Self {
        CostError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for CostError {
    fn from(err: serde_json::Error) -> Self {
        CostError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for CostError {
    fn from(err: ndarray::ShapeError) -> Self {
        CostError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CostError::DataError("test error".to_string());
        assert_eq!(err.to_string(), "Data error: test error");
    }

    #[test]
    fn test_missing_dataset_display() {
        let err = CostError::DatasetNotFound(PathBuf::from("missing.csv"));
        assert_eq!(err.to_string(), "Dataset not found: missing.csv");
        assert!(err.is_missing_input());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CostError = io_err.into();
        assert!(matches!(err, CostError::IoError(_)));
        assert!(!err.is_missing_input());
    }
}
