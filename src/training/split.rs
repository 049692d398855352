//! Seeded train/test partitioning

use crate::error::{HousePriceError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Row indices of a train/test partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl TrainTestSplit {
    /// Shuffle `0..n_samples` with `seed` and hold out `ceil(test_size * n)` rows.
    ///
    /// Both partitions must end up non-empty.
    pub fn new(n_samples: usize, test_size: f64, seed: u64) -> Result<Self> {
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(HousePriceError::ValidationError(format!(
                "test_size must be in (0, 1), got {}",
                test_size
            )));
        }

        let n_test = (test_size * n_samples as f64).ceil() as usize;
        let n_train = n_samples.saturating_sub(n_test);
        if n_test == 0 || n_train == 0 {
            return Err(HousePriceError::InsufficientData(format!(
                "{} rows cannot be split into non-empty train and test sets",
                n_samples
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let train = indices.split_off(n_test);
        Ok(Self { train, test: indices })
    }

    /// Gather the partition's rows out of `x` and `y`
    pub fn apply(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
    ) -> (Array2<f64>, Array2<f64>, Array1<f64>, Array1<f64>) {
        (
            x.select(Axis(0), &self.train),
            x.select(Axis(0), &self.test),
            y.select(Axis(0), &self.train),
            y.select(Axis(0), &self.test),
        )
    }
}
