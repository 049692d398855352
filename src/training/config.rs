//! Training configuration

use serde::{Deserialize, Serialize};

/// Default name of the column holding the sale price
pub const DEFAULT_TARGET: &str = "price";

/// Configuration for a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Target column name
    pub target_column: String,

    /// Fraction of rows held out for metrics
    pub test_size: f64,

    /// Seed for the train/test shuffle
    pub random_seed: u64,

    /// Whether the linear model fits an intercept
    pub fit_intercept: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            target_column: DEFAULT_TARGET.to_string(),
            test_size: 0.2,
            random_seed: 42,
            fit_intercept: true,
        }
    }
}

impl TrainingConfig {
    /// Create a configuration for the given target column
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target_column: target.into(),
            ..Default::default()
        }
    }

    /// Builder method to set the held-out fraction
    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    /// Builder method to set the shuffle seed
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Builder method to toggle the intercept
    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrainingConfig::default();
        assert_eq!(config.target_column, "price");
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.random_seed, 42);
    }

    #[test]
    fn test_builder() {
        let config = TrainingConfig::new("sale_price")
            .with_test_size(0.25)
            .with_random_seed(7)
            .with_fit_intercept(false);
        assert_eq!(config.target_column, "sale_price");
        assert_eq!(config.test_size, 0.25);
        assert_eq!(config.random_seed, 7);
        assert!(!config.fit_intercept);
    }
}
