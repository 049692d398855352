//! Dataset preprocessing pipeline

use crate::error::{HousePriceError, Result};
use super::{
    column_type,
    encoder::OneHotEncoder,
    schema::{FeatureColumn, FeatureSchema},
    ColumnType,
};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use tracing::debug;

/// Output of preprocessing: model inputs, target and the schema describing `x`
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub x: Array2<f64>,
    pub y: Array1<f64>,
    pub schema: FeatureSchema,
    /// Rows removed because they contained a missing value
    pub rows_dropped: usize,
}

impl PreparedData {
    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }
}

/// Drops incomplete rows, one-hot encodes categoricals and splits off the target
#[derive(Debug, Clone)]
pub struct DataPreprocessor {
    target_column: String,
    encoder: OneHotEncoder,
}

impl DataPreprocessor {
    pub fn new(target_column: impl Into<String>) -> Self {
        Self {
            target_column: target_column.into(),
            encoder: OneHotEncoder::new(),
        }
    }

    pub fn target_column(&self) -> &str {
        &self.target_column
    }

    /// Remove every row holding a null (or NaN float) in any column
    pub fn drop_incomplete_rows(df: &DataFrame) -> Result<DataFrame> {
        let mut keep = vec![true; df.height()];

        for column in df.get_columns() {
            let series = column.as_materialized_series();
            match series.dtype() {
                DataType::Float32 | DataType::Float64 => {
                    let casted = series.cast(&DataType::Float64)?;
                    for (i, v) in casted.f64()?.into_iter().enumerate() {
                        if v.map_or(true, f64::is_nan) {
                            keep[i] = false;
                        }
                    }
                }
                _ if series.null_count() > 0 => {
                    let nulls = series.is_null();
                    for (i, is_null) in nulls.into_iter().enumerate() {
                        if is_null == Some(true) {
                            keep[i] = false;
                        }
                    }
                }
                _ => {}
            }
        }

        if keep.iter().all(|k| *k) {
            return Ok(df.clone());
        }

        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        Ok(df.filter(&mask)?)
    }

    /// Run the full pipeline on a raw frame
    pub fn process(&mut self, df: &DataFrame) -> Result<PreparedData> {
        if df.column(&self.target_column).is_err() {
            return Err(HousePriceError::MissingColumn(self.target_column.clone()));
        }

        let clean = Self::drop_incomplete_rows(df)?;
        let rows_dropped = df.height() - clean.height();
        if clean.height() == 0 {
            return Err(HousePriceError::InsufficientData(format!(
                "no complete rows remain after dropping {} rows with missing values",
                rows_dropped
            )));
        }

        let target = clean.column(&self.target_column)?;
        if column_type(target.dtype()) != Some(ColumnType::Numeric) {
            return Err(HousePriceError::ValidationError(format!(
                "target column '{}' must be numeric, found {:?}",
                self.target_column,
                target.dtype()
            )));
        }
        let y = Array1::from(numeric_values(target)?);

        let mut columns: Vec<(FeatureColumn, Vec<f64>)> = Vec::new();
        let mut categorical: Vec<&str> = Vec::new();

        for column in clean.get_columns() {
            let name = column.name().as_str();
            if name == self.target_column {
                continue;
            }
            match column_type(column.dtype()) {
                Some(ColumnType::Numeric) => {
                    columns.push((FeatureColumn::numeric(name), numeric_values(column)?));
                }
                Some(ColumnType::Categorical) => categorical.push(name),
                None => {
                    return Err(HousePriceError::ValidationError(format!(
                        "column '{}' has unsupported type {:?}",
                        name,
                        column.dtype()
                    )));
                }
            }
        }

        self.encoder.fit(&clean, &categorical)?;
        columns.extend(self.encoder.transform(&clean)?);

        let n_rows = clean.height();
        let x = Array2::from_shape_fn((n_rows, columns.len()), |(r, c)| columns[c].1[r]);

        let schema = FeatureSchema::new(
            self.target_column.clone(),
            columns.into_iter().map(|(column, _)| column).collect(),
            self.encoder.levels().to_vec(),
        )?;

        debug!(
            rows = n_rows,
            rows_dropped,
            features = schema.len(),
            categorical = categorical.len(),
            "Preprocessed dataset"
        );

        Ok(PreparedData {
            x,
            y,
            schema,
            rows_dropped,
        })
    }
}

/// Convenience wrapper around [`DataPreprocessor::process`]
pub fn preprocess_frame(df: &DataFrame, target_column: &str) -> Result<PreparedData> {
    DataPreprocessor::new(target_column).process(df)
}

fn numeric_values(column: &Column) -> Result<Vec<f64>> {
    let casted = column.as_materialized_series().cast(&DataType::Float64)?;
    Ok(casted
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}
