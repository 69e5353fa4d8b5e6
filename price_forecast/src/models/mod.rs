//! Regressors that map a window of past prices to the next price

use crate::error::Result;
use crate::metrics::ForecastAccuracy;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Number of lagged prices every shipped model consumes
pub const DEFAULT_LAGS: usize = 7;

/// A fitted one-step-ahead price model.
///
/// The input window is ordered oldest first and holds exactly
/// [`Regressor::lags`] prices.
pub trait Regressor: Debug + Send + Sync {
    /// Predict the price that follows `window`
    fn predict(&self, window: &[f64]) -> Result<f64>;

    /// Window length the model expects
    fn lags(&self) -> usize {
        DEFAULT_LAGS
    }

    /// Name of the model
    fn name(&self) -> &str;

    /// Held-out evaluation recorded while training, if any
    fn training_report(&self) -> Option<&TrainingReport> {
        None
    }
}

/// Forecast model that can be trained on a daily price series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: Regressor + 'static;

    /// Train the model on daily prices, oldest first
    fn train(&self, series: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Evaluation of a trained model on its held-out rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Feature rows available after lagging
    pub samples: usize,
    /// Rows used for fitting
    pub train_rows: usize,
    /// Rows held out for scoring
    pub test_rows: usize,
    /// Coefficient of determination on the held-out rows
    pub r_squared: f64,
    /// Error metrics on the held-out rows
    pub accuracy: ForecastAccuracy,
}

pub mod arima;
pub mod lag_regression;
pub mod window_mean;
