//! ARIMA(p,1,q) on daily prices
//!
//! Prices are differenced once. The ARMA coefficients of the differences
//! come from two regressions: a long autoregression supplies residual
//! estimates, then each difference is regressed on its `p` predecessors and
//! the `q` preceding residuals. At prediction time the residuals are rebuilt
//! from the input window itself, starting from zero.

use crate::error::{ForecastError, Result};
use crate::models::lag_regression::featurize;
use crate::models::{ForecastModel, Regressor, DEFAULT_LAGS};
use price_math::regression::{least_squares, LinearFit};
use tracing::debug;

/// Fewest daily prices an ARIMA fit accepts
pub const MIN_POINTS: usize = 10;

/// Keeps the normal equations solvable on short or flat series
const RIDGE: f64 = 1e-6;

/// ARIMA trainer with one order of differencing
#[derive(Debug, Clone)]
pub struct Arima {
    /// Name of the model
    name: String,
    /// AR order (p)
    p: usize,
    /// MA order (q)
    q: usize,
    /// Price window handed to the trained model
    lags: usize,
    /// Minimum daily prices to train on
    min_points: usize,
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArima {
    name: String,
    p: usize,
    q: usize,
    lags: usize,
    /// Drift, then `p` AR and `q` MA coefficients, each block oldest first
    fit: LinearFit,
}

impl Arima {
    /// Create an ARIMA(p,1,q) trainer over the default 7-price window
    pub fn new(p: usize, q: usize) -> Result<Self> {
        Self {
            name: format!("ARIMA({},1,{})", p, q),
            p,
            q,
            lags: DEFAULT_LAGS,
            min_points: MIN_POINTS,
        }
        .with_lags(DEFAULT_LAGS)
    }

    /// Set the price window; it must hold `max(p, q) + 2` prices
    pub fn with_lags(mut self, lags: usize) -> Result<Self> {
        let needed = self.p.max(self.q) + 2;
        if lags < needed {
            return Err(ForecastError::ValidationError(format!(
                "{} needs a window of at least {} prices, got {}",
                self.name, needed, lags
            )));
        }
        self.lags = lags;
        Ok(self)
    }

    /// Require at least `min_points` daily prices
    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points.max(MIN_POINTS);
        self
    }

    /// Residuals of a long autoregression on the differences; zero where
    /// the autoregression has no prediction
    fn long_ar_residuals(&self, diffs: &[f64]) -> Result<(usize, Vec<f64>)> {
        let mut residuals = vec![0.0; diffs.len()];
        if self.q == 0 {
            return Ok((0, residuals));
        }

        let order = (self.p + self.q + 1).min((diffs.len() - 1) / 2).max(1);
        let (rows, targets) = featurize(diffs, order);
        let fit = least_squares(&rows, &targets, RIDGE)?;

        for (i, (row, target)) in rows.iter().zip(targets.iter()).enumerate() {
            residuals[i + order] = target - fit.predict(row)?;
        }

        Ok((order, residuals))
    }
}

impl Default for Arima {
    fn default() -> Self {
        Self {
            name: "ARIMA(1,1,1)".to_string(),
            p: 1,
            q: 1,
            lags: DEFAULT_LAGS,
            min_points: MIN_POINTS,
        }
    }
}

/// Regressor row for the difference at `t`: `p` differences then `q`
/// residuals, each oldest first
fn arma_row(diffs: &[f64], residuals: &[f64], t: usize, p: usize, q: usize) -> Vec<f64> {
    diffs[t - p..t]
        .iter()
        .chain(residuals[t - q..t].iter())
        .copied()
        .collect()
}

impl ForecastModel for Arima {
    type Trained = TrainedArima;

    fn train(&self, series: &[f64]) -> Result<Self::Trained> {
        if series.iter().any(|p| !p.is_finite()) {
            return Err(ForecastError::InvalidInput(
                "Training series contains non-finite prices".to_string(),
            ));
        }

        if series.len() < self.min_points {
            return Err(ForecastError::DataError(format!(
                "Not enough data for {} (need >={} daily prices, have {})",
                self.name,
                self.min_points,
                series.len()
            )));
        }

        let diffs: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();
        let (order, residuals) = self.long_ar_residuals(&diffs)?;

        let start = if self.q == 0 {
            self.p
        } else {
            self.p.max(order + self.q)
        };

        let (rows, targets): (Vec<Vec<f64>>, Vec<f64>) = (start..diffs.len())
            .map(|t| (arma_row(&diffs, &residuals, t, self.p, self.q), diffs[t]))
            .unzip();

        if rows.len() < self.p + self.q + 1 {
            return Err(ForecastError::DataError(format!(
                "Not enough data for {} ({} usable differences)",
                self.name,
                rows.len()
            )));
        }

        let fit = least_squares(&rows, &targets, RIDGE)?;

        debug!(
            model = %self.name,
            rows = rows.len(),
            drift = fit.intercept,
            "fitted arima"
        );

        Ok(TrainedArima {
            name: self.name.clone(),
            p: self.p,
            q: self.q,
            lags: self.lags,
            fit,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedArima {
    /// Drift and ARMA coefficients
    pub fn fit(&self) -> &LinearFit {
        &self.fit
    }

    fn next_difference(&self, diffs: &[f64], residuals: &[f64]) -> Result<f64> {
        let row = arma_row(diffs, residuals, diffs.len(), self.p, self.q);
        self.fit
            .predict(&row)
            .map_err(|e| ForecastError::ModelError(e.to_string()))
    }
}

impl Regressor for TrainedArima {
    fn predict(&self, window: &[f64]) -> Result<f64> {
        if window.len() != self.lags {
            return Err(ForecastError::InvalidInput(format!(
                "Expected a window of {} prices, got {}",
                self.lags,
                window.len()
            )));
        }

        let diffs: Vec<f64> = window.windows(2).map(|w| w[1] - w[0]).collect();
        let mut residuals = vec![0.0; diffs.len()];
        for t in self.p.max(self.q)..diffs.len() {
            let expected = self.next_difference(&diffs[..t], &residuals[..t])?;
            residuals[t] = diffs[t] - expected;
        }

        let last = window[window.len() - 1];
        Ok(last + self.next_difference(&diffs, &residuals)?)
    }

    fn lags(&self) -> usize {
        self.lags
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_must_cover_orders() {
        assert!(Arima::new(5, 1).is_ok());
        assert!(Arima::new(6, 0).is_err());
        assert!(Arima::new(2, 2).unwrap().with_lags(3).is_err());
    }

    #[test]
    fn test_arma_row_layout() {
        let diffs = [1.0, 2.0, 3.0, 4.0];
        let residuals = [0.1, 0.2, 0.3, 0.4];
        assert_eq!(arma_row(&diffs, &residuals, 3, 2, 1), vec![2.0, 3.0, 0.3]);
    }

    #[test]
    fn test_needs_ten_points() {
        let series: Vec<f64> = (0..9).map(|i| 100.0 + i as f64).collect();
        assert!(matches!(
            Arima::default().train(&series),
            Err(ForecastError::DataError(_))
        ));
    }

    #[test]
    fn test_linear_trend_continues() {
        let series: Vec<f64> = (0..30).map(|i| 200.0 + 1.5 * i as f64).collect();
        let trained = Arima::new(1, 0).unwrap().train(&series).unwrap();

        let next = trained.predict(&series[23..]).unwrap();
        assert!((next - 245.0).abs() < 1e-3, "next = {}", next);
    }
}
