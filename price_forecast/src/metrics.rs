//! Metrics derived from a forecast curve, and forecast accuracy

use crate::error::{ForecastError, Result};
use crate::forecaster::Forecast;
use price_math::round2;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Steps covered by the confidence band and the long point estimate
pub const BAND_STEPS: usize = 30;
/// Lower band scale applied to the minimum forecast value
pub const BAND_LOWER_SCALE: f64 = 0.98;
/// Upper band scale applied to the maximum forecast value
pub const BAND_UPPER_SCALE: f64 = 1.02;

/// Direction of the 30-day estimate relative to the current price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    /// Classify `predicted` against `current`
    pub fn classify(current: f64, predicted: f64) -> Self {
        if predicted > current {
            Trend::Up
        } else if predicted < current {
            Trend::Down
        } else {
            Trend::Stable
        }
    }

    /// Lowercase label used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point estimates, trend and band derived from a forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    /// Seventh step (or the first, for shorter forecasts), rounded to cents
    pub pred_7d: f64,
    /// Thirtieth step (or the last available), rounded to cents
    pub pred_30d: f64,
    /// Direction of the unrounded 30-day estimate against the current price
    pub trend: Trend,
    /// `round2(min(first 30 steps) * 0.98)`
    pub confidence_min: f64,
    /// `round2(max(first 30 steps) * 1.02)`
    pub confidence_max: f64,
}

/// Derive point estimates, trend and confidence band.
///
/// The band is a fixed-percentage heuristic over the first 30 steps (all
/// steps when fewer), not a statistical interval, so individual forecast
/// values are not guaranteed to lie inside it after rounding.
pub fn summarize(values: &[f64], current_price: f64) -> Result<ForecastSummary> {
    if values.is_empty() {
        return Err(ForecastError::InvalidInput(
            "Cannot summarize an empty forecast".to_string(),
        ));
    }

    if !current_price.is_finite() {
        return Err(ForecastError::InvalidInput(format!(
            "Current price must be finite, got {}",
            current_price
        )));
    }

    let pred_7d = if values.len() >= 7 { values[6] } else { values[0] };
    let pred_30d = if values.len() >= BAND_STEPS {
        values[BAND_STEPS - 1]
    } else {
        values[values.len() - 1]
    };

    let band = &values[..values.len().min(BAND_STEPS)];
    let low = Statistics::min(band.iter());
    let high = Statistics::max(band.iter());

    Ok(ForecastSummary {
        pred_7d: round2(pred_7d),
        pred_30d: round2(pred_30d),
        trend: Trend::classify(current_price, pred_30d),
        confidence_min: round2(low * BAND_LOWER_SCALE),
        confidence_max: round2(high * BAND_UPPER_SCALE),
    })
}

impl Forecast {
    /// Summarize this forecast against the current price
    pub fn summarize(&self, current_price: f64) -> Result<ForecastSummary> {
        summarize(self.values(), current_price)
    }
}

/// Error metrics of `predicted` against `actual`, pairwise.
///
/// MAPE averages only over non-zero actual prices and is zero when every
/// actual price is zero. sMAPE counts a pair that is zero on both sides as
/// a perfect hit.
pub fn forecast_accuracy(predicted: &[f64], actual: &[f64]) -> Result<ForecastAccuracy> {
    if predicted.is_empty() || predicted.len() != actual.len() {
        return Err(ForecastError::ValidationError(format!(
            "Need equally long, non-empty series (predicted {}, actual {})",
            predicted.len(),
            actual.len()
        )));
    }

    let pairs = || actual.iter().copied().zip(predicted.iter().copied());
    let count = predicted.len() as f64;

    let mae = pairs().map(|(a, p)| (a - p).abs()).sum::<f64>() / count;
    let mse = pairs().map(|(a, p)| (a - p).powi(2)).sum::<f64>() / count;

    let (pct_sum, pct_count) = pairs()
        .filter(|(a, _)| *a != 0.0)
        .fold((0.0, 0usize), |(sum, n), (a, p)| {
            (sum + (a - p).abs() / a.abs() * 100.0, n + 1)
        });
    let mape = if pct_count == 0 {
        0.0
    } else {
        pct_sum / pct_count as f64
    };

    let smape = pairs()
        .map(|(a, p)| match a.abs() + p.abs() {
            denom if denom == 0.0 => 0.0,
            denom => 200.0 * (a - p).abs() / denom,
        })
        .sum::<f64>()
        / count;

    Ok(ForecastAccuracy {
        mae,
        mse,
        rmse: mse.sqrt(),
        mape,
        smape,
    })
}

/// Held-out error metrics of a trained model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastAccuracy {
    /// Mean absolute error, in price units
    pub mae: f64,
    /// Mean squared error
    pub mse: f64,
    /// Root of `mse`
    pub rmse: f64,
    /// Mean absolute percentage error over non-zero actual prices
    pub mape: f64,
    /// Symmetric mean absolute percentage error
    pub smape: f64,
}

impl std::fmt::Display for ForecastAccuracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MAE {:.4}, RMSE {:.4}, MAPE {:.2}%, sMAPE {:.2}%",
            self.mae, self.rmse, self.mape, self.smape
        )
    }
}
