//! Regression metrics

use crate::error::{HousePriceError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Error metrics for a set of point predictions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Coefficient of determination
    pub r2: f64,
}

impl RegressionMetrics {
    /// Compute metrics for `y_pred` against `y_true`.
    ///
    /// R² stays finite: a constant target scores 1.0 when predicted exactly
    /// and 0.0 otherwise.
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(HousePriceError::ShapeError {
                expected: format!("{} predictions", y_true.len()),
                actual: format!("{} predictions", y_pred.len()),
            });
        }
        if y_true.is_empty() {
            return Err(HousePriceError::InsufficientData(
                "cannot compute metrics over zero samples".to_string(),
            ));
        }

        let n = y_true.len() as f64;
        let errors = y_true - y_pred;

        let mse = errors.mapv(|e| e * e).sum() / n;
        let mae = errors.mapv(f64::abs).sum() / n;

        let y_mean = y_true.mean().unwrap_or(0.0);
        let ss_res = errors.mapv(|e| e * e).sum();
        let ss_tot = y_true.mapv(|v| (v - y_mean) * (v - y_mean)).sum();
        let r2 = if ss_tot == 0.0 {
            if ss_res == 0.0 { 1.0 } else { 0.0 }
        } else {
            1.0 - ss_res / ss_tot
        };

        Ok(Self {
            mae,
            mse,
            rmse: mse.sqrt(),
            r2,
        })
    }
}
