//! Schema-driven record encoding and scoring

use super::{PredictRequest, Record};
use crate::error::{HousePriceError, Result};
use crate::export::{ArtifactStore, TrainedArtifacts};
use crate::preprocessing::{FeatureColumn, FeatureSchema};
use crate::training::NO_MODEL_MESSAGE;
use ndarray::Array2;
use tracing::debug;
use uuid::Uuid;

/// In-memory snapshot of a stored model and its schema
#[derive(Debug, Clone)]
pub struct Predictor {
    artifacts: TrainedArtifacts,
}

impl Predictor {
    /// Load the stored pair; `None` when nothing has been trained yet
    pub fn load(store: &ArtifactStore) -> Result<Option<Self>> {
        Ok(store.load()?.map(Self::from_artifacts))
    }

    pub fn from_artifacts(artifacts: TrainedArtifacts) -> Self {
        Self { artifacts }
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.artifacts.schema()
    }

    pub fn model_id(&self) -> Uuid {
        self.artifacts.model.model_id
    }

    /// Build the model input matrix for `records`.
    ///
    /// Numeric columns take the record's number (0 when absent or not numeric).
    /// An indicator column takes the record's value under its own encoded name
    /// when present, otherwise 1 when the source value equals the level.
    /// Keys outside the schema are ignored.
    pub fn encode_records(&self, records: &[Record]) -> Array2<f64> {
        let columns = &self.schema().columns;
        Array2::from_shape_fn((records.len(), columns.len()), |(r, c)| {
            let record = &records[r];
            match &columns[c] {
                FeatureColumn::Numeric { name } => record
                    .get(name)
                    .and_then(|v| v.as_f64())
                    .filter(|v| v.is_finite())
                    .unwrap_or(0.0),
                FeatureColumn::Indicator { name, source, level } => {
                    if let Some(v) = record.get(name).and_then(|v| v.as_f64()).filter(|v| v.is_finite()) {
                        return v;
                    }
                    let hit = record
                        .get(source)
                        .and_then(|v| v.as_text())
                        .map_or(false, |v| v == level);
                    if hit { 1.0 } else { 0.0 }
                }
            }
        })
    }

    /// One prediction per requested record, in request order
    pub fn predict(&self, request: &PredictRequest) -> Result<Vec<f64>> {
        let records = request.records()?;
        let x = self.encode_records(records);
        let predictions = self.artifacts.model.model.predict(&x)?;

        debug!(
            records = records.len(),
            model_id = %self.model_id(),
            "Scored records"
        );
        Ok(predictions.to_vec())
    }
}

/// Load the stored model and score `request`; `NotFound` before any training
pub fn predict_with_store(store: &ArtifactStore, request: &PredictRequest) -> Result<Vec<f64>> {
    // reject malformed requests before touching the disk
    request.records()?;
    let predictor = Predictor::load(store)?
        .ok_or_else(|| HousePriceError::NotFound(NO_MODEL_MESSAGE.to_string()))?;
    predictor.predict(request)
}
