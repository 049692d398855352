//! Data preprocessing module
//!
//! Turns a raw housing table into model inputs:
//! - Drop rows with any missing value (no imputation)
//! - One-hot encode string columns, dropping the first level
//! - Split features from the target
//! - Record the resulting [`FeatureSchema`] for inference-time alignment

mod encoder;
mod pipeline;
pub mod schema;

pub use encoder::{indicator_name, CategoryLevels, OneHotEncoder};
pub use pipeline::{preprocess_frame, DataPreprocessor, PreparedData};
pub use schema::{FeatureColumn, FeatureSchema, SCHEMA_VERSION};

use polars::prelude::DataType;
use serde::{Deserialize, Serialize};

/// How a raw column is treated during encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Numeric,
    Categorical,
}

/// Classify a polars dtype; `None` for types the pipeline cannot encode
pub fn column_type(dtype: &DataType) -> Option<ColumnType> {
    match dtype {
        DataType::Int32
        | DataType::Int64
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float32
        | DataType::Float64
        | DataType::Boolean => Some(ColumnType::Numeric),
        DataType::String => Some(ColumnType::Categorical),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_type() {
        assert_eq!(column_type(&DataType::Int64), Some(ColumnType::Numeric));
        assert_eq!(column_type(&DataType::Boolean), Some(ColumnType::Numeric));
        assert_eq!(column_type(&DataType::String), Some(ColumnType::Categorical));
        assert_eq!(column_type(&DataType::Null), None);
    }

    #[test]
    fn test_column_type_serialize() {
        let json = serde_json::to_string(&ColumnType::Numeric).unwrap();
        assert_eq!(json, "\"Numeric\"");
    }
}
