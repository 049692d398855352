//! Inference against the stored model
//!
//! Incoming records are encoded straight into the stored feature schema, so
//! the column layout never depends on which categories a request contains.

mod engine;

pub use engine::{predict_with_store, Predictor};

use crate::error::{HousePriceError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single raw input value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl FeatureValue {
    /// Numeric reading of the value; text counts only when it parses as a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(v) => Some(*v),
            FeatureValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            FeatureValue::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Number(v)
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        FeatureValue::Text(s.to_string())
    }
}

/// Raw feature name to value
pub type Record = HashMap<String, FeatureValue>;

/// Body of a prediction call: exactly one of `record` or `records`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<Record>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<Record>>,
}

impl PredictRequest {
    pub fn single(record: Record) -> Self {
        Self {
            record: Some(record),
            records: None,
        }
    }

    pub fn batch(records: Vec<Record>) -> Self {
        Self {
            record: None,
            records: Some(records),
        }
    }

    /// The records to score, in request order
    pub fn records(&self) -> Result<&[Record]> {
        match (&self.record, &self.records) {
            (Some(record), None) => Ok(std::slice::from_ref(record)),
            (None, Some(records)) if records.is_empty() => Err(HousePriceError::ValidationError(
                "'records' must contain at least one record".to_string(),
            )),
            (None, Some(records)) => Ok(records),
            (Some(_), Some(_)) => Err(HousePriceError::ValidationError(
                "Provide either 'record' or 'records', not both".to_string(),
            )),
            (None, None) => Err(HousePriceError::ValidationError(
                "Provide 'record' or 'records'".to_string(),
            )),
        }
    }
}

/// Prediction output, one price per input record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<f64>,
}
