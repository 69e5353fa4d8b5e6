//! Linear regression on lagged daily prices
//!
//! Each training row is the `lags` prices preceding a day, oldest first, and
//! the target is that day's price. This is the same window layout the
//! iterative forecaster feeds the trained model.

use crate::error::{ForecastError, Result};
use crate::metrics::forecast_accuracy;
use crate::models::{ForecastModel, Regressor, TrainingReport, DEFAULT_LAGS};
use crate::utils::train_test_split_shuffled;
use price_math::regression::{least_squares, LinearFit};
use price_math::stats::r_squared;
use tracing::debug;

/// Lag regression trainer
#[derive(Debug, Clone)]
pub struct LagRegression {
    /// Name of the model
    name: String,
    /// Number of lagged prices per row
    lags: usize,
    /// Minimum feature rows required to train
    min_samples: usize,
    /// Share of rows held out for scoring
    test_ratio: f64,
    /// Seed for the train/test shuffle
    seed: u64,
    /// Ridge penalty on slope coefficients
    ridge: f64,
}

/// Trained lag regression
#[derive(Debug, Clone)]
pub struct TrainedLagRegression {
    /// Name of the model
    name: String,
    /// Number of lagged prices per row
    lags: usize,
    /// Fitted coefficients, one per lag
    fit: LinearFit,
    /// Held-out evaluation
    report: TrainingReport,
}

impl LagRegression {
    /// Create a new trainer over `lags` lagged prices
    pub fn new(lags: usize) -> Result<Self> {
        if lags == 0 {
            return Err(ForecastError::ValidationError(
                "Lag count must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Lag Regression (lags={})", lags),
            lags,
            min_samples: 50,
            test_ratio: 0.2,
            seed: 42,
            ridge: 1e-3,
        })
    }

    /// Require at least `min_samples` feature rows
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    /// Hold out `test_ratio` of the rows for scoring
    pub fn with_test_ratio(mut self, test_ratio: f64) -> Result<Self> {
        if !(test_ratio > 0.0 && test_ratio < 1.0) {
            return Err(ForecastError::ValidationError(
                "Test ratio must be between 0 and 1".to_string(),
            ));
        }
        self.test_ratio = test_ratio;
        Ok(self)
    }

    /// Seed the train/test shuffle
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the ridge penalty
    pub fn with_ridge(mut self, ridge: f64) -> Result<Self> {
        if !(ridge >= 0.0) || !ridge.is_finite() {
            return Err(ForecastError::ValidationError(
                "Ridge penalty must be a non-negative number".to_string(),
            ));
        }
        self.ridge = ridge;
        Ok(self)
    }

    /// Number of lagged prices per row
    pub fn lags(&self) -> usize {
        self.lags
    }
}

impl Default for LagRegression {
    fn default() -> Self {
        Self {
            name: format!("Lag Regression (lags={})", DEFAULT_LAGS),
            lags: DEFAULT_LAGS,
            min_samples: 50,
            test_ratio: 0.2,
            seed: 42,
            ridge: 1e-3,
        }
    }
}

/// Turn a price series into lagged feature rows and next-day targets
pub fn featurize(series: &[f64], lags: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
    if lags == 0 || series.len() <= lags {
        return (Vec::new(), Vec::new());
    }

    series
        .windows(lags + 1)
        .map(|w| (w[..lags].to_vec(), w[lags]))
        .unzip()
}

impl ForecastModel for LagRegression {
    type Trained = TrainedLagRegression;

    fn train(&self, series: &[f64]) -> Result<Self::Trained> {
        if series.iter().any(|p| !p.is_finite()) {
            return Err(ForecastError::InvalidInput(
                "Training series contains non-finite prices".to_string(),
            ));
        }

        let (rows, targets) = featurize(series, self.lags);
        if rows.len() < self.min_samples {
            return Err(ForecastError::DataError(format!(
                "Not enough samples to train (need >={}, have {})",
                self.min_samples,
                rows.len()
            )));
        }

        let (train_idx, test_idx) = train_test_split_shuffled(rows.len(), self.test_ratio, self.seed)?;

        let train_rows: Vec<Vec<f64>> = train_idx.iter().map(|&i| rows[i].clone()).collect();
        let train_targets: Vec<f64> = train_idx.iter().map(|&i| targets[i]).collect();

        let fit = least_squares(&train_rows, &train_targets, self.ridge)?;

        let actual: Vec<f64> = test_idx.iter().map(|&i| targets[i]).collect();
        let predicted = test_idx
            .iter()
            .map(|&i| fit.predict(&rows[i]))
            .collect::<price_math::Result<Vec<f64>>>()?;

        let report = TrainingReport {
            samples: rows.len(),
            train_rows: train_rows.len(),
            test_rows: actual.len(),
            r_squared: r_squared(&actual, &predicted)?,
            accuracy: forecast_accuracy(&predicted, &actual)?,
        };

        debug!(
            model = %self.name,
            samples = report.samples,
            r_squared = report.r_squared,
            "trained lag regression"
        );

        Ok(TrainedLagRegression {
            name: self.name.clone(),
            lags: self.lags,
            fit,
            report,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedLagRegression {
    /// Fitted intercept and per-lag coefficients
    pub fn fit(&self) -> &LinearFit {
        &self.fit
    }
}

impl Regressor for TrainedLagRegression {
    fn predict(&self, window: &[f64]) -> Result<f64> {
        if window.len() != self.lags {
            return Err(ForecastError::InvalidInput(format!(
                "Expected a window of {} prices, got {}",
                self.lags,
                window.len()
            )));
        }

        self.fit
            .predict(window)
            .map_err(|e| ForecastError::ModelError(e.to_string()))
    }

    fn lags(&self) -> usize {
        self.lags
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn training_report(&self) -> Option<&TrainingReport> {
        Some(&self.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_featurize_orders_lags_oldest_first() {
        let (rows, targets) = featurize(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(rows, vec![vec![1.0, 2.0, 3.0], vec![2.0, 3.0, 4.0]]);
        assert_eq!(targets, vec![4.0, 5.0]);
    }

    #[test]
    fn test_featurize_short_series() {
        let (rows, targets) = featurize(&[1.0, 2.0, 3.0], 3);
        assert!(rows.is_empty());
        assert!(targets.is_empty());
    }
}
