//! Feature schema shared between training and inference
//!
//! The schema is the ordered list of encoded columns a fitted model expects.
//! It is persisted next to the model and every scoring path goes through it,
//! so the model input width never depends on what a request happens to contain.

use crate::error::{HousePriceError, Result};
use super::encoder::CategoryLevels;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Current on-disk schema format
pub const SCHEMA_VERSION: u32 = 1;

/// One encoded model input column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureColumn {
    /// Raw numeric column passed through unchanged
    Numeric { name: String },
    /// 0/1 indicator for `source == level`
    Indicator {
        name: String,
        source: String,
        level: String,
    },
}

impl FeatureColumn {
    pub fn numeric(name: impl Into<String>) -> Self {
        FeatureColumn::Numeric { name: name.into() }
    }

    /// Encoded column name
    pub fn name(&self) -> &str {
        match self {
            FeatureColumn::Numeric { name } | FeatureColumn::Indicator { name, .. } => name,
        }
    }
}

/// Ordered feature columns plus the categorical levels seen at fit time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u32,
    pub target: String,
    pub columns: Vec<FeatureColumn>,
    #[serde(default)]
    pub categories: Vec<CategoryLevels>,
}

impl FeatureSchema {
    /// Build a schema, rejecting duplicate column names
    pub fn new(
        target: impl Into<String>,
        columns: Vec<FeatureColumn>,
        categories: Vec<CategoryLevels>,
    ) -> Result<Self> {
        let schema = Self {
            version: SCHEMA_VERSION,
            target: target.into(),
            columns,
            categories,
        };
        schema.validate()?;
        Ok(schema)
    }

    /// Check version and column uniqueness of a (possibly deserialized) schema
    pub fn validate(&self) -> Result<()> {
        if self.version != SCHEMA_VERSION {
            return Err(HousePriceError::ArtifactError(format!(
                "unsupported schema version {} (expected {})",
                self.version, SCHEMA_VERSION
            )));
        }

        let mut seen = HashSet::with_capacity(self.columns.len());
        for column in &self.columns {
            if column.name() == self.target {
                return Err(HousePriceError::ValidationError(format!(
                    "feature column '{}' collides with the target",
                    column.name()
                )));
            }
            if !seen.insert(column.name()) {
                return Err(HousePriceError::ValidationError(format!(
                    "duplicate feature column '{}'",
                    column.name()
                )));
            }
        }
        Ok(())
    }

    /// Number of model input columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Encoded column names in model order
    pub fn feature_names(&self) -> Vec<&str> {
        self.columns.iter().map(FeatureColumn::name).collect()
    }

    /// Reorder `x` (whose columns are named by `names`) into this schema.
    ///
    /// Schema columns absent from `names` are zero-filled; columns in `names`
    /// that the schema does not know are dropped.
    pub fn reindex<S: AsRef<str>>(&self, names: &[S], x: &Array2<f64>) -> Result<Array2<f64>> {
        if names.len() != x.ncols() {
            return Err(HousePriceError::ShapeError {
                expected: format!("{} named columns", names.len()),
                actual: format!("{} columns", x.ncols()),
            });
        }

        let positions: HashMap<&str, usize> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_ref(), i))
            .collect();
        let sources: Vec<Option<usize>> = self
            .columns
            .iter()
            .map(|column| positions.get(column.name()).copied())
            .collect();

        Ok(Array2::from_shape_fn((x.nrows(), self.len()), |(r, c)| {
            sources[c].map_or(0.0, |src| x[[r, src]])
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn schema() -> FeatureSchema {
        FeatureSchema::new(
            "price",
            vec![
                FeatureColumn::numeric("bedrooms"),
                FeatureColumn::numeric("sqft_living"),
                FeatureColumn::Indicator {
                    name: "city_Seattle".into(),
                    source: "city".into(),
                    level: "Seattle".into(),
                },
            ],
            vec![CategoryLevels {
                column: "city".into(),
                levels: vec!["Kent".into(), "Seattle".into()],
            }],
        )
        .unwrap()
    }

    #[test]
    fn test_reindex_fills_and_drops() {
        let x = array![[1500.0, 9.0, 3.0], [2000.0, 8.0, 4.0]];
        let names = ["sqft_living", "city_Tacoma", "bedrooms"];

        let aligned = schema().reindex(&names, &x).unwrap();

        assert_eq!(aligned, array![[3.0, 1500.0, 0.0], [4.0, 2000.0, 0.0]]);
    }

    #[test]
    fn test_reindex_rejects_mismatched_names() {
        let x = array![[1.0, 2.0]];
        assert!(schema().reindex(&["bedrooms"], &x).is_err());
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let result = FeatureSchema::new(
            "price",
            vec![FeatureColumn::numeric("a"), FeatureColumn::numeric("a")],
            Vec::new(),
        );
        assert!(matches!(result, Err(HousePriceError::ValidationError(_))));
    }

    #[test]
    fn test_serialized_column_kind() {
        let json = serde_json::to_value(&schema().columns[2]).unwrap();
        assert_eq!(json["kind"], "indicator");
        assert_eq!(json["source"], "city");
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut schema = schema();
        schema.version = SCHEMA_VERSION + 1;
        assert!(matches!(schema.validate(), Err(HousePriceError::ArtifactError(_))));
    }
}
