//! Error types for the house price service

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, HousePriceError>;

/// Coarse error category surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Dataset file or trained artifacts are absent
    NotFound,
    /// The caller supplied something unusable
    Validation,
    /// Unexpected failure while loading, fitting or scoring
    Internal,
}

/// Main error type for the house price pipeline
#[derive(Error, Debug)]
pub enum HousePriceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Target column '{0}' not found in dataset")]
    MissingColumn(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Artifact error: {0}")]
    ArtifactError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl HousePriceError {
    /// Map the error into the caller-facing taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            HousePriceError::NotFound(_) => ErrorKind::NotFound,
            HousePriceError::MissingColumn(_)
            | HousePriceError::ValidationError(_)
            | HousePriceError::InsufficientData(_) => ErrorKind::Validation,
            HousePriceError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                ErrorKind::NotFound
            }
            _ => ErrorKind::Internal,
        }
    }
}

impl From<polars::error::PolarsError> for HousePriceError {
    fn from(err: polars::error::PolarsError) -> Self {
        HousePriceError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for HousePriceError {
    fn from(err: serde_json::Error) -> Self {
        HousePriceError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for HousePriceError {
    fn from(err: ndarray::ShapeError) -> Self {
        HousePriceError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
