//! Linear least squares with an intercept
//!
//! Fits `y = b0 + b1*x1 + ... + bk*xk` by solving the normal equations
//! `(XᵀX + λI)β = Xᵀy`. The ridge term `λ` is applied to the slope
//! coefficients only, never to the intercept.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Pivots smaller than this are treated as a singular system
const PIVOT_EPSILON: f64 = 1e-12;

/// Fitted linear model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    /// Constant term
    pub intercept: f64,
    /// One coefficient per feature, in feature order
    pub coefficients: Vec<f64>,
}

impl LinearFit {
    /// Number of features the fit expects
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Evaluate the fit on one feature row
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.coefficients.len() {
            return Err(MathError::InvalidInput(format!(
                "Expected {} features, got {}",
                self.coefficients.len(),
                features.len()
            )));
        }

        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(features.iter())
                .map(|(c, x)| c * x)
                .sum::<f64>())
    }
}

/// Fit a ridge-regularised linear model with intercept.
///
/// # Arguments
/// * `rows` - Feature rows, all of the same length
/// * `targets` - One target per row
/// * `ridge` - Non-negative penalty added to the slope diagonal
pub fn least_squares(rows: &[Vec<f64>], targets: &[f64], ridge: f64) -> Result<LinearFit> {
    if rows.is_empty() {
        return Err(MathError::InsufficientData(
            "Need at least one row to fit a regression".to_string(),
        ));
    }

    if rows.len() != targets.len() {
        return Err(MathError::InvalidInput(format!(
            "Rows ({}) and targets ({}) differ in length",
            rows.len(),
            targets.len()
        )));
    }

    if !(ridge >= 0.0) || !ridge.is_finite() {
        return Err(MathError::InvalidInput(format!(
            "Ridge penalty must be a non-negative number, got {}",
            ridge
        )));
    }

    let n_features = rows[0].len();
    if rows.iter().any(|r| r.len() != n_features) {
        return Err(MathError::InsufficientData(
            "All feature rows must have the same length".to_string(),
        ));
    }

    // Augmented dimension: intercept column first
    let dim = n_features + 1;
    let mut gram = vec![vec![0.0; dim]; dim];
    let mut moment = vec![0.0; dim];

    for (row, &y) in rows.iter().zip(targets.iter()) {
        for i in 0..dim {
            let xi = if i == 0 { 1.0 } else { row[i - 1] };
            moment[i] += xi * y;
            for j in i..dim {
                let xj = if j == 0 { 1.0 } else { row[j - 1] };
                gram[i][j] += xi * xj;
            }
        }
    }

    // Mirror the upper triangle
    for i in 0..dim {
        for j in 0..i {
            gram[i][j] = gram[j][i];
        }
    }

    for (i, row) in gram.iter_mut().enumerate().skip(1) {
        row[i] += ridge;
    }

    let beta = solve(gram, moment)?;

    Ok(LinearFit {
        intercept: beta[0],
        coefficients: beta[1..].to_vec(),
    })
}

/// Gaussian elimination with partial pivoting
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&x, &y| a[x][col].abs().total_cmp(&a[y][col].abs()))
            .unwrap_or(col);

        if a[pivot_row][col].abs() < PIVOT_EPSILON {
            return Err(MathError::CalculationError(
                "Normal equations are singular".to_string(),
            ));
        }

        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }

    if x.iter().any(|v| !v.is_finite()) {
        return Err(MathError::CalculationError(
            "Regression produced non-finite coefficients".to_string(),
        ));
    }

    Ok(x)
}
