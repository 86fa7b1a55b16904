//! Linear model implementations

use crate::error::{CostError, Result};
use super::cross_validation::{take_elements, take_rows, CVResults, CVStrategy, CrossValidator};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Solve symmetric positive-definite system Ax = b using Cholesky decomposition.
/// A matrix that is not numerically positive definite gets a small diagonal
/// jitter and one retry before giving up.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return None;
    }

    cholesky_factor(a)
        .or_else(|| {
            let jitter = 1e-8 * a.diag().iter().map(|v| v.abs()).sum::<f64>() / n.max(1) as f64;
            let mut a_reg = a.clone();
            for k in 0..n {
                a_reg[[k, k]] += jitter;
            }
            cholesky_factor(&a_reg)
        })
        .map(|l| {
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
            x
        })
}

/// Lower-triangular L with A = L * L^T, or None if A is not positive definite
fn cholesky_factor(a: &Array2<f64>) -> Option<Array2<f64>> {
    let n = a.nrows();
    let mut l = Array2::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }

            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
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

/// Matrix inversion using Gauss-Jordan elimination with partial pivoting (fallback)
fn matrix_inverse(m: &Array2<f64>) -> Option<Array2<f64>> {
    let n = m.nrows();
    if n != m.ncols() {
        return None;
    }

    // Augmented matrix [M | I]
    let mut aug = Array2::zeros((n, 2 * n));
    for i in 0..n {
        for j in 0..n {
            aug[[i, j]] = m[[i, j]];
        }
        aug[[i, n + i]] = 1.0;
    }

    for col in 0..n {
        let mut max_row = col;
        for row in col + 1..n {
            if aug[[row, col]].abs() > aug[[max_row, col]].abs() {
                max_row = row;
            }
        }

        if max_row != col {
            for j in 0..2 * n {
                aug.swap([col, j], [max_row, j]);
            }
        }

        if aug[[col, col]].abs() < 1e-10 {
            return None;
        }

        let pivot = aug[[col, col]];
        for j in 0..2 * n {
            aug[[col, j]] /= pivot;
        }

        for row in 0..n {
            if row != col {
                let factor = aug[[row, col]];
                for j in 0..2 * n {
                    aug[[row, j]] -= factor * aug[[col, j]];
                }
            }
        }
    }

    Some(aug.slice(ndarray::s![.., n..]).to_owned())
}

/// Coefficient of determination
pub fn r2_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let y_mean = y_true.mean().unwrap_or(0.0);
    let ss_res = (y_pred - y_true).mapv(|v| v * v).sum();
    let ss_tot = y_true.mapv(|v| (v - y_mean) * (v - y_mean)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }

    1.0 - ss_res / ss_tot
}

/// Ridge Regression (L2-regularized linear regression)
///
/// Minimizes `||y - Xw - b||² + alpha * ||w||²`; the intercept is not penalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeRegression {
    pub coefficients: Option<Array1<f64>>,
    pub intercept: Option<f64>,
    /// L2 regularization strength
    pub alpha: f64,
    pub is_fitted: bool,
}

impl Default for RidgeRegression {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl RidgeRegression {
    pub fn new(alpha: f64) -> Self {
        Self {
            coefficients: None,
            intercept: None,
            alpha,
            is_fitted: false,
        }
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();
        if n_samples != y.len() {
            return Err(CostError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(CostError::TrainingError("cannot fit on zero rows".to_string()));
        }

        let x_mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| CostError::TrainingError("empty feature matrix".to_string()))?;
        let y_mean = y.mean().unwrap_or(0.0);
        let x_c = x - &x_mean.view().insert_axis(Axis(0));
        let y_c = y - y_mean;

        let mut xtx = x_c.t().dot(&x_c);
        for i in 0..n_features {
            xtx[[i, i]] += self.alpha;
        }
        let xty = x_c.t().dot(&y_c);

        let coefficients = match cholesky_solve(&xtx, &xty) {
            Some(result) => result,
            None => match matrix_inverse(&xtx) {
                Some(inv) => inv.dot(&xty),
                None => return Err(CostError::ComputationError("Singular matrix".to_string())),
            },
        };

        self.intercept = Some(y_mean - coefficients.dot(&x_mean));
        self.coefficients = Some(coefficients);
        self.is_fitted = true;
        Ok(self)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let (coefficients, intercept) = self.parameters()?;
        if x.ncols() != coefficients.len() {
            return Err(CostError::ShapeError {
                expected: format!("{} features", coefficients.len()),
                actual: format!("{} features", x.ncols()),
            });
        }
        Ok(x.dot(coefficients) + intercept)
    }

    /// Predict a single already-scaled row
    pub fn predict_row(&self, row: ArrayView1<f64>) -> Result<f64> {
        let (coefficients, intercept) = self.parameters()?;
        if row.len() != coefficients.len() {
            return Err(CostError::ShapeError {
                expected: format!("{} features", coefficients.len()),
                actual: format!("{} features", row.len()),
            });
        }
        Ok(row.dot(coefficients) + intercept)
    }

    /// R² on the given data
    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        let y_pred = self.predict(x)?;
        Ok(r2_score(y, &y_pred))
    }

    /// Fitted coefficients and intercept
    pub fn parameters(&self) -> Result<(&Array1<f64>, f64)> {
        match (&self.coefficients, self.intercept) {
            (Some(coefficients), Some(intercept)) if self.is_fitted => Ok((coefficients, intercept)),
            _ => Err(CostError::ModelNotFitted),
        }
    }
}

/// Ridge regression with the regularization strength picked by K-fold CV.
///
/// Every candidate alpha is scored by mean R² across folds; the best one
/// (first on ties) is refit on the full data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeCV {
    pub alphas: Vec<f64>,
    pub cv: CVStrategy,
    /// Chosen regularization strength
    pub alpha: Option<f64>,
    /// Mean CV score of the chosen alpha
    pub best_score: Option<f64>,
    pub model: Option<RidgeRegression>,
}

impl Default for RidgeCV {
    fn default() -> Self {
        Self::new(vec![0.1, 1.0, 10.0], 5)
    }
}

impl RidgeCV {
    pub fn new(alphas: Vec<f64>, n_splits: usize) -> Self {
        Self {
            alphas,
            cv: CVStrategy::KFold { n_splits },
            alpha: None,
            best_score: None,
            model: None,
        }
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        if self.alphas.is_empty() {
            return Err(CostError::InvalidParameter {
                name: "alphas".to_string(),
                value: "[]".to_string(),
                reason: "at least one candidate is required".to_string(),
            });
        }
        if let Some(&bad) = self.alphas.iter().find(|a| !(**a > 0.0)) {
            return Err(CostError::InvalidParameter {
                name: "alpha".to_string(),
                value: bad.to_string(),
                reason: "must be positive".to_string(),
            });
        }

        let splits = CrossValidator::new(self.cv.clone()).split(x.nrows())?;

        let results: Vec<CVResults> = self
            .alphas
            .par_iter()
            .map(|&alpha| {
                let scores = splits
                    .iter()
                    .map(|split| {
                        let x_train = take_rows(x, &split.train_indices);
                        let y_train = take_elements(y, &split.train_indices);
                        let x_test = take_rows(x, &split.test_indices);
                        let y_test = take_elements(y, &split.test_indices);

                        let mut model = RidgeRegression::new(alpha);
                        model.fit(&x_train, &y_train)?;
                        model.score(&x_test, &y_test)
                    })
                    .collect::<Result<Vec<f64>>>()?;
                Ok(CVResults::from_scores(scores))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut best = 0;
        for (idx, result) in results.iter().enumerate() {
            debug!(
                alpha = self.alphas[idx],
                mean_r2 = result.mean_score,
                std_r2 = result.std_score,
                "Ridge CV candidate"
            );
            if result.mean_score > results[best].mean_score {
                best = idx;
            }
        }

        let alpha = self.alphas[best];
        let mut model = RidgeRegression::new(alpha);
        model.fit(x, y)?;

        self.alpha = Some(alpha);
        self.best_score = Some(results[best].mean_score);
        self.model = Some(model);
        Ok(self)
    }

    /// The refit model, once `fit` has run
    pub fn best_model(&self) -> Result<&RidgeRegression> {
        self.model.as_ref().ok_or(CostError::ModelNotFitted)
    }

    pub fn into_model(self) -> Result<RidgeRegression> {
        self.model.ok_or(CostError::ModelNotFitted)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.best_model()?.predict(x)
    }

    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        self.best_model()?.score(x, y)
    }
}
