//! Model training
//!
//! Ordinary least squares on a seeded train/test split, scored with
//! MAE, MSE, RMSE and R².

mod config;
mod engine;
mod models;
mod split;
pub mod linear_models;

pub use config::{TrainingConfig, DEFAULT_TARGET};
pub use engine::{default_dataset_path, EvalReport, TrainReport, Trainer, NO_MODEL_MESSAGE};
pub use linear_models::LinearRegression;
pub use models::RegressionMetrics;
pub use split::TrainTestSplit;
