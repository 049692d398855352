//! Training and evaluation runs over a CSV dataset

use super::{LinearRegression, RegressionMetrics, TrainTestSplit, TrainingConfig};
use crate::error::{HousePriceError, Result};
use crate::export::{ArtifactStore, TrainedArtifacts};
use crate::preprocessing::DataPreprocessor;
use crate::utils::DataLoader;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Message returned whenever a stored model is required but absent
pub const NO_MODEL_MESSAGE: &str = "No trained model found. Train first with /train.";

/// Summary of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainReport {
    pub train_size: usize,
    pub test_size: usize,
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
    pub r2: f64,
    pub model_path: String,
}

/// Scores of the stored model over a full dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalReport {
    pub samples: usize,
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
    pub r2: f64,
}

/// Loads, preprocesses, fits and persists
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainingConfig,
    loader: DataLoader,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            loader: DataLoader::new(),
        }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Fit on a seeded 80/20 split of `csv_path` and replace the stored model
    pub fn train_and_save(&self, csv_path: impl AsRef<Path>, store: &ArtifactStore) -> Result<TrainReport> {
        let start = Instant::now();
        let csv_path = csv_path.as_ref();

        let df = self.loader.load_csv(csv_path)?;
        let prepared = DataPreprocessor::new(self.config.target_column.clone()).process(&df)?;

        let split = TrainTestSplit::new(
            prepared.n_samples(),
            self.config.test_size,
            self.config.random_seed,
        )?;
        let (x_train, x_test, y_train, y_test) = split.apply(&prepared.x, &prepared.y);

        let mut model = LinearRegression::new().with_fit_intercept(self.config.fit_intercept);
        model.fit(&x_train, &y_train)?;

        let y_pred = model.predict(&x_test)?;
        let metrics = RegressionMetrics::compute(&y_test, &y_pred)?;

        let artifacts = TrainedArtifacts::new(
            model,
            prepared.schema,
            split.train.len(),
            split.test.len(),
            metrics,
        );
        let model_path = store.save(&artifacts)?;

        info!(
            path = %csv_path.display(),
            train_size = split.train.len(),
            test_size = split.test.len(),
            rows_dropped = prepared.rows_dropped,
            r2 = metrics.r2,
            rmse = metrics.rmse,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Trained model"
        );

        Ok(TrainReport {
            train_size: split.train.len(),
            test_size: split.test.len(),
            mae: metrics.mae,
            mse: metrics.mse,
            rmse: metrics.rmse,
            r2: metrics.r2,
            model_path: model_path.display().to_string(),
        })
    }

    /// Score the stored model on every complete row of `csv_path`.
    ///
    /// The dataset is usually the one the model was trained on, so these
    /// numbers overstate out-of-sample accuracy.
    pub fn evaluate_saved(&self, csv_path: impl AsRef<Path>, store: &ArtifactStore) -> Result<EvalReport> {
        let artifacts = store
            .load()?
            .ok_or_else(|| HousePriceError::NotFound(NO_MODEL_MESSAGE.to_string()))?;
        let schema = artifacts.schema();
        let csv_path = csv_path.as_ref();

        let df = self.loader.load_csv(csv_path)?;
        let prepared = DataPreprocessor::new(schema.target.clone()).process(&df)?;

        let x = schema.reindex(&prepared.schema.feature_names(), &prepared.x)?;
        let y_pred = artifacts.model.model.predict(&x)?;
        let metrics = RegressionMetrics::compute(&prepared.y, &y_pred)?;

        info!(
            path = %csv_path.display(),
            samples = prepared.n_samples(),
            model_id = %artifacts.model.model_id,
            r2 = metrics.r2,
            "Evaluated stored model"
        );

        Ok(EvalReport {
            samples: prepared.n_samples(),
            mae: metrics.mae,
            mse: metrics.mse,
            rmse: metrics.rmse,
            r2: metrics.r2,
        })
    }
}

/// Default location of the uploaded dataset under `data_dir`
pub fn default_dataset_path(data_dir: impl AsRef<Path>) -> PathBuf {
    data_dir.as_ref().join("data.csv")
}
