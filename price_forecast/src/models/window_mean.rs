//! Window mean baseline

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, Regressor, DEFAULT_LAGS};
use price_math::stats::mean;

/// Predicts the arithmetic mean of the input window
#[derive(Debug, Clone)]
pub struct WindowMean {
    /// Name of the model
    name: String,
    /// Window size
    lags: usize,
}

impl WindowMean {
    /// Create a window mean over `lags` prices
    pub fn new(lags: usize) -> Result<Self> {
        if lags == 0 {
            return Err(ForecastError::ValidationError(
                "Window size must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Window Mean (lags={})", lags),
            lags,
        })
    }
}

impl Default for WindowMean {
    fn default() -> Self {
        Self {
            name: format!("Window Mean (lags={})", DEFAULT_LAGS),
            lags: DEFAULT_LAGS,
        }
    }
}

impl Regressor for WindowMean {
    fn predict(&self, window: &[f64]) -> Result<f64> {
        if window.len() != self.lags {
            return Err(ForecastError::InvalidInput(format!(
                "Expected a window of {} prices, got {}",
                self.lags,
                window.len()
            )));
        }

        Ok(mean(window)?)
    }

    fn lags(&self) -> usize {
        self.lags
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl ForecastModel for WindowMean {
    type Trained = WindowMean;

    fn train(&self, series: &[f64]) -> Result<Self::Trained> {
        if series.len() < self.lags {
            return Err(ForecastError::DataError(format!(
                "Insufficient data for {}. Need at least {} observations.",
                self.name, self.lags
            )));
        }

        Ok(self.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_predicts_mean() {
        let model = WindowMean::new(3).unwrap();
        assert_approx_eq!(model.predict(&[1.0, 2.0, 6.0]).unwrap(), 3.0);
    }

    #[test]
    fn test_wrong_window_length() {
        let model = WindowMean::default();
        assert!(matches!(
            model.predict(&[1.0, 2.0]),
            Err(ForecastError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_zero_lags_rejected() {
        assert!(WindowMean::new(0).is_err());
    }

    #[test]
    fn test_train_needs_a_full_window() {
        let model = WindowMean::default();
        assert!(model.train(&[1.0; 6]).is_err());
        assert_eq!(model.train(&[1.0; 7]).unwrap().lags(), 7);
    }
}
