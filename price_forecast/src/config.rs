//! Settings loaded from TOML with environment overrides

use crate::error::{ForecastError, Result};
use crate::models::arima::Arima;
use crate::models::lag_regression::LagRegression;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Days forecast per request
pub const DEFAULT_HORIZON: usize = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub forecast: ForecastSettings,
    #[serde(default)]
    pub training: TrainingSettings,
    #[serde(default)]
    pub estimate: EstimateSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_dataset_path")]
    pub dataset_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSettings {
    #[serde(default = "default_horizon")]
    pub horizon: usize,
    #[serde(default = "default_history_days")]
    pub history_days: usize,
    #[serde(default = "default_model_confidence_pct")]
    pub confidence_pct: u8,
}

/// Trainable model family
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    #[default]
    LagRegression,
    Arima,
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lag_regression" | "lag-regression" | "lag" => Ok(ModelKind::LagRegression),
            "arima" => Ok(ModelKind::Arima),
            other => Err(format!("Unknown model '{}', expected lag_regression or arima", other)),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::LagRegression => f.write_str("lag_regression"),
            ModelKind::Arima => f.write_str("arima"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSettings {
    #[serde(default)]
    pub model: ModelKind,
    #[serde(default = "default_lags")]
    pub lags: usize,
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    #[serde(default = "default_test_ratio")]
    pub test_ratio: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_ridge")]
    pub ridge: f64,
    #[serde(default = "default_arima_p")]
    pub arima_p: usize,
    #[serde(default = "default_arima_q")]
    pub arima_q: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateSettings {
    #[serde(default = "default_monthly_growth")]
    pub monthly_growth: f64,
    #[serde(default = "default_estimate_confidence_pct")]
    pub confidence_pct: u8,
}

fn default_dataset_path() -> String { "davaobuild_dataset_2025_2026.csv".to_string() }
fn default_horizon() -> usize { DEFAULT_HORIZON }
fn default_history_days() -> usize { 90 }
fn default_model_confidence_pct() -> u8 { 80 }
fn default_lags() -> usize { 7 }
fn default_min_samples() -> usize { 50 }
fn default_test_ratio() -> f64 { 0.2 }
fn default_seed() -> u64 { 42 }
fn default_ridge() -> f64 { 1e-3 }
fn default_arima_p() -> usize { 1 }
fn default_arima_q() -> usize { 1 }
fn default_monthly_growth() -> f64 { 0.05 }
fn default_estimate_confidence_pct() -> u8 { 75 }

impl Default for DataSettings {
    fn default() -> Self {
        Self { dataset_path: default_dataset_path() }
    }
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            horizon: default_horizon(),
            history_days: default_history_days(),
            confidence_pct: default_model_confidence_pct(),
        }
    }
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            lags: default_lags(),
            min_samples: default_min_samples(),
            test_ratio: default_test_ratio(),
            seed: default_seed(),
            ridge: default_ridge(),
            model: ModelKind::default(),
            arima_p: default_arima_p(),
            arima_q: default_arima_q(),
        }
    }
}

impl Default for EstimateSettings {
    fn default() -> Self {
        Self {
            monthly_growth: default_monthly_growth(),
            confidence_pct: default_estimate_confidence_pct(),
        }
    }
}

impl Settings {
    /// Read and validate a TOML settings file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            ForecastError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml(&contents)
    }

    /// Parse and validate settings from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply `DAVAO_DATASET` and `DAVAO_HORIZON` from the environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("DAVAO_DATASET") {
            self.data.dataset_path = path;
        }

        if let Ok(horizon) = std::env::var("DAVAO_HORIZON") {
            self.forecast.horizon = horizon.parse().map_err(|e| {
                ForecastError::ConfigError(format!("DAVAO_HORIZON={}: {}", horizon, e))
            })?;
        }

        self.validate()
    }

    /// Reject settings the forecaster or trainer cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.forecast.horizon == 0 {
            return Err(ForecastError::ConfigError(
                "forecast.horizon must be at least 1".to_string(),
            ));
        }
        if self.training.lags == 0 {
            return Err(ForecastError::ConfigError(
                "training.lags must be at least 1".to_string(),
            ));
        }
        if self.forecast.history_days < self.training.lags {
            return Err(ForecastError::ConfigError(format!(
                "forecast.history_days ({}) must cover training.lags ({})",
                self.forecast.history_days, self.training.lags
            )));
        }
        if !(self.training.test_ratio > 0.0 && self.training.test_ratio < 1.0) {
            return Err(ForecastError::ConfigError(
                "training.test_ratio must be between 0 and 1".to_string(),
            ));
        }
        if !(self.training.ridge >= 0.0) {
            return Err(ForecastError::ConfigError(
                "training.ridge must be non-negative".to_string(),
            ));
        }
        if !self.estimate.monthly_growth.is_finite() {
            return Err(ForecastError::ConfigError(
                "estimate.monthly_growth must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Lag regression trainer configured from `[training]`
    pub fn trainer(&self) -> Result<LagRegression> {
        LagRegression::new(self.training.lags)?
            .with_min_samples(self.training.min_samples)
            .with_seed(self.training.seed)
            .with_test_ratio(self.training.test_ratio)?
            .with_ridge(self.training.ridge)
    }

    /// ARIMA trainer configured from `[training]`
    pub fn arima_trainer(&self) -> Result<Arima> {
        Arima::new(self.training.arima_p, self.training.arima_q)?.with_lags(self.training.lags)
    }
}
