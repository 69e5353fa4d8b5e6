//! Iterative multi-step forecasting
//!
//! A one-step regressor is rolled forward by feeding each prediction back
//! into its own input window. Step `k` therefore sees the predictions of
//! steps `1..k` rather than observed prices, and errors compound over the
//! horizon. The loop is never re-grounded on observed data.

use crate::error::{ForecastError, Result};
use crate::models::Regressor;
use price_math::round2;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Predicted prices, index 0 is one step ahead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    values: Vec<f64>,
}

impl Forecast {
    /// Forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of steps forecasted
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a forecast produced by [`forecast`]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values rounded to cents
    pub fn rounded(&self) -> Vec<f64> {
        self.values.iter().map(|v| round2(*v)).collect()
    }

    /// Take ownership of the values
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

impl From<Forecast> for Vec<f64> {
    fn from(forecast: Forecast) -> Self {
        forecast.values
    }
}

/// Produce `steps` predictions by repeatedly predicting one step ahead.
///
/// The buffer starts as a copy of the last `model.lags()` prices of
/// `seed_window` (most recent last). Each step reads the trailing
/// `model.lags()` values of the buffer, predicts, and appends the prediction
/// to both the output and the buffer.
///
/// # Errors
/// * [`ForecastError::InvalidInput`] if `steps` is zero, the seed window is
///   shorter than the model's lag count, or it contains non-finite prices
/// * Any error returned by the model; no partial forecast is returned
/// * [`ForecastError::ModelError`] if the model returns a non-finite value
pub fn forecast<M>(model: &M, seed_window: &[f64], steps: usize) -> Result<Forecast>
where
    M: Regressor + ?Sized,
{
    let lags = model.lags();

    if steps == 0 {
        return Err(ForecastError::InvalidInput(
            "Forecast horizon must be at least one step".to_string(),
        ));
    }

    if lags == 0 {
        return Err(ForecastError::InvalidInput(format!(
            "Model {} declares an empty input window",
            model.name()
        )));
    }

    if seed_window.len() < lags {
        return Err(ForecastError::InvalidInput(format!(
            "Seed window needs at least {} prices, got {}",
            lags,
            seed_window.len()
        )));
    }

    if let Some(bad) = seed_window.iter().find(|p| !p.is_finite()) {
        return Err(ForecastError::InvalidInput(format!(
            "Seed window contains a non-finite price: {}",
            bad
        )));
    }

    let mut buffer = Vec::with_capacity(lags + steps);
    buffer.extend_from_slice(&seed_window[seed_window.len() - lags..]);

    let mut values = Vec::with_capacity(steps);

    for step in 0..steps {
        let window = &buffer[buffer.len() - lags..];
        let prediction = model.predict(window)?;

        if !prediction.is_finite() {
            return Err(ForecastError::ModelError(format!(
                "Model {} returned {} at step {}",
                model.name(),
                prediction,
                step + 1
            )));
        }

        trace!(step = step + 1, prediction, "forecast step");
        values.push(prediction);
        buffer.push(prediction);
    }

    debug!(model = model.name(), steps, lags, "iterative forecast complete");

    Ok(Forecast { values })
}
