//! House price prediction service
//!
//! Trains an ordinary least-squares model on a housing CSV, stores it with
//! the feature schema it was fit against, and serves predictions.
//!
//! # Modules
//!
//! - [`utils`] - CSV loading
//! - [`preprocessing`] - Missing-row removal, one-hot encoding, feature schema
//! - [`training`] - Train/test split, linear regression, metrics, evaluation
//! - [`inference`] - Schema-aligned prediction for raw records
//! - [`export`] - Model and schema persistence
//! - [`server`] - HTTP API and form client
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Core ML modules
pub mod preprocessing;
pub mod training;
pub mod inference;

// Utilities
pub mod export;
pub mod utils;

// Services
pub mod server;
pub mod cli;

pub use error::{HousePriceError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{ErrorKind, HousePriceError, Result};
    pub use crate::preprocessing::{preprocess_frame, DataPreprocessor, FeatureColumn, FeatureSchema, PreparedData};
    pub use crate::training::{EvalReport, LinearRegression, RegressionMetrics, TrainReport, Trainer, TrainingConfig};
    pub use crate::inference::{predict_with_store, FeatureValue, PredictRequest, Predictor, Record};
    pub use crate::export::{ArtifactStore, TrainedArtifacts};
    pub use crate::utils::DataLoader;
}
