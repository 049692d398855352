//! One-hot encoding for categorical columns

use crate::error::{HousePriceError, Result};
use super::schema::FeatureColumn;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Name of the indicator column for `level` of `column`
pub fn indicator_name(column: &str, level: &str) -> String {
    format!("{}_{}", column, level)
}

/// Distinct levels observed for one categorical column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryLevels {
    pub column: String,
    /// Sorted ascending; with drop-first encoding the first entry is the baseline
    pub levels: Vec<String>,
}

impl CategoryLevels {
    /// Reference level that gets no indicator column
    pub fn baseline(&self) -> Option<&str> {
        self.levels.first().map(|s| s.as_str())
    }
}

/// One-hot encoder with optional baseline dropping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    drop_first: bool,
    mappings: Vec<CategoryLevels>,
    is_fitted: bool,
}

impl Default for OneHotEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl OneHotEncoder {
    /// Create an encoder that drops the first level of every column
    pub fn new() -> Self {
        Self {
            drop_first: true,
            mappings: Vec::new(),
            is_fitted: false,
        }
    }

    /// Keep or drop the baseline level
    pub fn with_drop_first(mut self, drop_first: bool) -> Self {
        self.drop_first = drop_first;
        self
    }

    /// Record the sorted levels of each listed string column
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        self.mappings.clear();

        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| HousePriceError::DataError(format!("Column '{}' not found", col_name)))?;
            let ca = column
                .as_materialized_series()
                .str()
                .map_err(|e| HousePriceError::DataError(e.to_string()))?;

            let levels: BTreeSet<&str> = ca.into_iter().flatten().collect();
            self.mappings.push(CategoryLevels {
                column: col_name.to_string(),
                levels: levels.into_iter().map(str::to_string).collect(),
            });
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Levels recorded during fit, in column order
    pub fn levels(&self) -> &[CategoryLevels] {
        &self.mappings
    }

    /// Indicator columns this encoder emits, in output order
    pub fn output_columns(&self) -> Vec<FeatureColumn> {
        self.mappings
            .iter()
            .flat_map(|mapping| {
                self.encoded_levels(mapping).iter().map(move |level| FeatureColumn::Indicator {
                    name: indicator_name(&mapping.column, level),
                    source: mapping.column.clone(),
                    level: level.clone(),
                })
            })
            .collect()
    }

    /// Produce one 0/1 vector per indicator column
    pub fn transform(&self, df: &DataFrame) -> Result<Vec<(FeatureColumn, Vec<f64>)>> {
        if !self.is_fitted {
            return Err(HousePriceError::ModelNotFitted);
        }

        let mut encoded = Vec::new();
        for mapping in &self.mappings {
            let column = df.column(&mapping.column).map_err(|_| {
                HousePriceError::DataError(format!("Column '{}' not found", mapping.column))
            })?;
            let ca = column
                .as_materialized_series()
                .str()
                .map_err(|e| HousePriceError::DataError(e.to_string()))?;

            for level in self.encoded_levels(mapping) {
                let values: Vec<f64> = ca
                    .into_iter()
                    .map(|v| if v == Some(level.as_str()) { 1.0 } else { 0.0 })
                    .collect();
                encoded.push((
                    FeatureColumn::Indicator {
                        name: indicator_name(&mapping.column, level),
                        source: mapping.column.clone(),
                        level: level.clone(),
                    },
                    values,
                ));
            }
        }

        Ok(encoded)
    }

    fn encoded_levels<'a>(&self, mapping: &'a CategoryLevels) -> &'a [String] {
        if self.drop_first && !mapping.levels.is_empty() {
            &mapping.levels[1..]
        } else {
            &mapping.levels
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city_frame() -> DataFrame {
        df!(
            "city" => &["Seattle", "Bellevue", "Kent", "Seattle", "Bellevue"],
            "sqft" => &[1500.0, 2100.0, 1200.0, 1700.0, 2500.0]
        )
        .unwrap()
    }

    #[test]
    fn test_levels_are_sorted() {
        let df = city_frame();
        let mut encoder = OneHotEncoder::new();
        encoder.fit(&df, &["city"]).unwrap();

        let levels = &encoder.levels()[0];
        assert_eq!(levels.levels, vec!["Bellevue", "Kent", "Seattle"]);
        assert_eq!(levels.baseline(), Some("Bellevue"));
    }

    #[test]
    fn test_drop_first_encoding() {
        let df = city_frame();
        let mut encoder = OneHotEncoder::new();
        encoder.fit(&df, &["city"]).unwrap();
        let encoded = encoder.transform(&df).unwrap();

        let names: Vec<&str> = encoded.iter().map(|(c, _)| c.name()).collect();
        assert_eq!(names, vec!["city_Kent", "city_Seattle"]);
        assert_eq!(encoded[0].1, vec![0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(encoded[1].1, vec![1.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_keep_all_levels() {
        let df = city_frame();
        let mut encoder = OneHotEncoder::new().with_drop_first(false);
        encoder.fit(&df, &["city"]).unwrap();
        assert_eq!(encoder.output_columns().len(), 3);
    }

    #[test]
    fn test_single_level_emits_nothing() {
        let df = df!("city" => &["Kent", "Kent"]).unwrap();
        let mut encoder = OneHotEncoder::new();
        encoder.fit(&df, &["city"]).unwrap();
        assert!(encoder.transform(&df).unwrap().is_empty());
    }

    #[test]
    fn test_transform_before_fit() {
        let encoder = OneHotEncoder::new();
        assert!(matches!(
            encoder.transform(&city_frame()),
            Err(HousePriceError::ModelNotFitted)
        ));
    }
}
