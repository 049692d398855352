//! On-disk store for the latest trained model and its feature schema
//!
//! The model and its metadata are two JSON files under one directory. Each is
//! written to a temp file in that directory and renamed into place, and both
//! carry the same `model_id` so a half-replaced pair is detected on load.

use crate::error::{HousePriceError, Result};
use crate::preprocessing::FeatureSchema;
use crate::training::{LinearRegression, RegressionMetrics};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// File name of the fitted model artifact
pub const MODEL_FILE: &str = "house_price_model.json";
/// File name of the schema/metadata artifact
pub const META_FILE: &str = "model_meta.json";

/// Persisted fitted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_id: Uuid,
    pub trained_at: DateTime<Utc>,
    pub model: LinearRegression,
}

/// Persisted feature schema and training summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_id: Uuid,
    pub trained_at: DateTime<Utc>,
    pub schema: FeatureSchema,
    pub train_size: usize,
    pub test_size: usize,
    pub metrics: RegressionMetrics,
}

/// A model together with the schema it was trained against
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedArtifacts {
    pub model: ModelArtifact,
    pub metadata: ModelMetadata,
}

impl TrainedArtifacts {
    /// Stamp a freshly fitted model and its schema with a shared identity
    pub fn new(
        model: LinearRegression,
        schema: FeatureSchema,
        train_size: usize,
        test_size: usize,
        metrics: RegressionMetrics,
    ) -> Self {
        let model_id = Uuid::new_v4();
        let trained_at = Utc::now();
        Self {
            model: ModelArtifact {
                model_id,
                trained_at,
                model,
            },
            metadata: ModelMetadata {
                model_id,
                trained_at,
                schema,
                train_size,
                test_size,
                metrics,
            },
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.metadata.schema
    }

    /// Check the pair belongs together and the model fits the schema
    pub fn validate(&self) -> Result<()> {
        if self.model.model_id != self.metadata.model_id {
            return Err(HousePriceError::ArtifactError(format!(
                "model {} does not match metadata {}; retrain to repair",
                self.model.model_id, self.metadata.model_id
            )));
        }

        self.metadata.schema.validate()?;

        match self.model.model.n_features() {
            Some(n) if self.model.model.is_fitted && n == self.metadata.schema.len() => Ok(()),
            Some(n) => Err(HousePriceError::ArtifactError(format!(
                "model expects {} features but schema lists {}",
                n,
                self.metadata.schema.len()
            ))),
            None => Err(HousePriceError::ModelNotFitted),
        }
    }
}

/// Directory-backed store holding a single model/schema pair
#[derive(Debug)]
pub struct ArtifactStore {
    dir: PathBuf,
    lock: RwLock<()>,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.dir.join(META_FILE)
    }

    /// Whether both artifacts are present
    pub fn exists(&self) -> bool {
        let _guard = self.lock.read();
        self.model_path().is_file() && self.metadata_path().is_file()
    }

    /// Replace the stored pair, returning the model artifact path
    pub fn save(&self, artifacts: &TrainedArtifacts) -> Result<PathBuf> {
        artifacts.validate()?;

        let _guard = self.lock.write();
        fs::create_dir_all(&self.dir)?;

        let model_path = self.model_path();
        write_json_atomic(&self.dir, &model_path, &artifacts.model)?;
        write_json_atomic(&self.dir, &self.metadata_path(), &artifacts.metadata)?;

        info!(
            model_id = %artifacts.model.model_id,
            path = %model_path.display(),
            features = artifacts.schema().len(),
            "Persisted model artifacts"
        );
        Ok(model_path)
    }

    /// Load the stored pair; `None` when either artifact is missing
    pub fn load(&self) -> Result<Option<TrainedArtifacts>> {
        let _guard = self.lock.read();

        let model: ModelArtifact = match read_json(&self.model_path())? {
            Some(m) => m,
            None => return Ok(None),
        };
        let metadata: ModelMetadata = match read_json(&self.metadata_path())? {
            Some(m) => m,
            None => return Ok(None),
        };

        let artifacts = TrainedArtifacts { model, metadata };
        artifacts.validate()?;

        debug!(model_id = %artifacts.model.model_id, "Loaded model artifacts");
        Ok(Some(artifacts))
    }
}

fn write_json_atomic<T: Serialize>(dir: &Path, path: &Path, value: &T) -> Result<()> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(tmp.as_file_mut(), value)?;
    tmp.as_file_mut().flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| HousePriceError::IoError(e.error))?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_str(&json).map(Some).map_err(|e| {
        HousePriceError::ArtifactError(format!("{} is corrupt: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::FeatureColumn;
    use ndarray::array;

    fn fitted_artifacts() -> TrainedArtifacts {
        let mut model = LinearRegression::new();
        model
            .fit(&array![[1.0], [2.0], [3.0]], &array![2.0, 4.0, 6.0])
            .unwrap();
        let schema =
            FeatureSchema::new("price", vec![FeatureColumn::numeric("sqft_living")], Vec::new())
                .unwrap();
        let metrics = RegressionMetrics {
            mae: 0.0,
            mse: 0.0,
            rmse: 0.0,
            r2: 1.0,
        };
        TrainedArtifacts::new(model, schema, 2, 1, metrics)
    }

    #[test]
    fn test_load_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        assert!(!store.exists());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("models"));
        let artifacts = fitted_artifacts();

        let path = store.save(&artifacts).unwrap();
        assert_eq!(path, store.model_path());
        assert!(store.exists());

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, artifacts);
    }

    #[test]
    fn test_missing_metadata_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.save(&fitted_artifacts()).unwrap();
        fs::remove_file(store.metadata_path()).unwrap();

        assert!(!store.exists());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_mismatched_pair_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.save(&fitted_artifacts()).unwrap();

        // model file from one run, metadata from another
        let other = fitted_artifacts();
        write_json_atomic(dir.path(), &store.metadata_path(), &other.metadata).unwrap();

        assert!(matches!(store.load(), Err(HousePriceError::ArtifactError(_))));
    }

    #[test]
    fn test_overwrite_replaces_pair() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.save(&fitted_artifacts()).unwrap();
        let second = fitted_artifacts();
        store.save(&second).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.model.model_id, second.model.model_id);

        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 2);
    }
}
