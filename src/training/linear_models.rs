//! Ordinary least-squares linear regression

use crate::error::{HousePriceError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Pivots below this fraction of their own diagonal entry count as singular
const CHOLESKY_REL_TOL: f64 = 1e-10;

/// Ridge added to each diagonal entry, relative to that entry, when the
/// Gram matrix is not positive definite
const FALLBACK_RIDGE: f64 = 1e-8;

/// Cholesky factor L of a symmetric positive-definite matrix (A = L * L^T)
fn cholesky(a: &Array2<f64>) -> Option<Array2<f64>> {
    let n = a.nrows();
    if n != a.ncols() {
        return None;
    }

    let mut l = Array2::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }

            if i == j {
                let diag = a[[i, i]] - sum;
                let tol = CHOLESKY_REL_TOL * a[[i, i]].abs().max(f64::MIN_POSITIVE);
                if diag <= tol {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    Some(l)
}

/// Solve Ax = b for symmetric positive-definite A
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if n != b.len() {
        return None;
    }
    let l = cholesky(a)?;

    // Forward substitution: L * y = b
    let mut y = Array1::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * y[j];
        }
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    // Backward substitution: L^T * x = y
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (y[i] - sum) / l[[i, i]];
    }

    Some(x)
}

/// Gauss-Jordan elimination with partial pivoting on [A | b]
fn gauss_jordan_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return None;
    }

    let mut aug = Array2::zeros((n, n + 1));
    for i in 0..n {
        for j in 0..n {
            aug[[i, j]] = a[[i, j]];
        }
        aug[[i, n]] = b[i];
    }

    for col in 0..n {
        let mut max_row = col;
        for row in col + 1..n {
            if aug[[row, col]].abs() > aug[[max_row, col]].abs() {
                max_row = row;
            }
        }

        if max_row != col {
            for j in 0..=n {
                aug.swap([col, j], [max_row, j]);
            }
        }

        if aug[[col, col]].abs() < 1e-12 {
            return None;
        }

        let pivot = aug[[col, col]];
        for j in 0..=n {
            aug[[col, j]] /= pivot;
        }

        for row in 0..n {
            if row != col {
                let factor = aug[[row, col]];
                for j in 0..=n {
                    aug[[row, j]] -= factor * aug[[col, j]];
                }
            }
        }
    }

    Some(aug.column(n).to_owned())
}

/// Solve least squares via normal equations: (X^T X) w = X^T y
///
/// Columns are rescaled to unit root-mean-square first so that a rare 0/1
/// indicator next to a column in the millions is conditioned like any other.
/// A rank-deficient Gram matrix (collinear one-hot columns, constant columns,
/// more features than rows) gets a tiny per-diagonal ridge before the
/// Gauss-Jordan fallback.
fn solve_least_squares(x: &Array2<f64>, y: &Array1<f64>) -> Option<Array1<f64>> {
    let n = x.nrows().max(1) as f64;
    let scale: Array1<f64> = x
        .axis_iter(Axis(1))
        .map(|col| {
            let rms = (col.dot(&col) / n).sqrt();
            if rms > 0.0 && rms.is_finite() { rms } else { 1.0 }
        })
        .collect();
    let x_scaled = x / &scale.view().insert_axis(Axis(0));

    let xtx = x_scaled.t().dot(&x_scaled);
    let xty = x_scaled.t().dot(y);

    let w = cholesky_solve(&xtx, &xty)
        .or_else(|| {
            let mut regularized = xtx.clone();
            for i in 0..xtx.nrows() {
                let d = xtx[[i, i]].abs();
                regularized[[i, i]] += FALLBACK_RIDGE * if d > 0.0 { d } else { 1.0 };
            }
            cholesky_solve(&regularized, &xty)
        })
        .or_else(|| gauss_jordan_solve(&xtx, &xty))?;

    Some(w / &scale)
}

/// Linear regression model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Fitted coefficients, one per feature column
    pub coefficients: Option<Array1<f64>>,
    /// Fitted intercept
    pub intercept: Option<f64>,
    /// Whether to fit intercept
    pub fit_intercept: bool,
    pub is_fitted: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Create a new linear regression model
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            fit_intercept: true,
            is_fitted: false,
        }
    }

    /// Enable/disable fitting intercept
    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Number of input features the fitted model expects
    pub fn n_features(&self) -> Option<usize> {
        self.coefficients.as_ref().map(|c| c.len())
    }

    /// Fit the model to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();

        if n_samples != y.len() {
            return Err(HousePriceError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(HousePriceError::InsufficientData(
                "cannot fit a linear model on zero rows".to_string(),
            ));
        }

        let (coefficients, intercept) = if self.fit_intercept {
            let x_mean = x
                .mean_axis(Axis(0))
                .ok_or_else(|| HousePriceError::ComputationError("empty feature matrix".to_string()))?;
            let y_mean = y.mean().unwrap_or(0.0);

            let x_centered = x - &x_mean.view().insert_axis(Axis(0));
            let y_centered = y - y_mean;

            let coefficients = solve_least_squares(&x_centered, &y_centered).ok_or_else(|| {
                HousePriceError::ComputationError(
                    "Matrix is singular, cannot solve least squares".to_string(),
                )
            })?;
            let intercept = y_mean - coefficients.dot(&x_mean);
            (coefficients, intercept)
        } else {
            let coefficients = solve_least_squares(x, y).ok_or_else(|| {
                HousePriceError::ComputationError(
                    "Matrix is singular, cannot solve least squares".to_string(),
                )
            })?;
            (coefficients, 0.0)
        };

        if coefficients.iter().any(|c| !c.is_finite()) || !intercept.is_finite() {
            return Err(HousePriceError::ComputationError(
                "least squares produced non-finite coefficients".to_string(),
            ));
        }

        self.coefficients = Some(coefficients);
        self.intercept = Some(intercept);
        self.is_fitted = true;

        Ok(self)
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = match (&self.coefficients, self.is_fitted) {
            (Some(c), true) => c,
            _ => return Err(HousePriceError::ModelNotFitted),
        };

        if x.ncols() != coefficients.len() {
            return Err(HousePriceError::ShapeError {
                expected: format!("{} feature columns", coefficients.len()),
                actual: format!("{} feature columns", x.ncols()),
            });
        }

        Ok(x.dot(coefficients) + self.intercept.unwrap_or(0.0))
    }
}
