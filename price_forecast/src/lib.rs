//! # Price Forecast
//!
//! Construction-material price history and forecasting for the Davao Build
//! market dashboard.
//!
//! ## Features
//!
//! - Dataset loading (CSV) into immutable price observations
//! - Daily series aggregation: one arithmetic mean per calendar date
//! - Regressors mapping a 7-price window to the next price, including a
//!   lag regression and an ARIMA(p,1,q) trained on the aggregated series
//! - Iterative forecasting that feeds each prediction back into the window
//! - Derived metrics: 7/30-day estimates, trend label, confidence band
//! - A price service with explicit fallback to demo figures
//!
//! ## Iterative forecasting
//!
//! The forecaster never re-grounds on observed prices mid-horizon. Step `k`
//! sees predictions `1..k` as its most recent inputs:
//!
//! ```rust
//! use price_forecast::forecaster::forecast;
//! use price_forecast::models::window_mean::WindowMean;
//!
//! let seed = [100.0, 101.0, 100.0, 102.0, 101.0, 103.0, 102.0];
//! let curve = forecast(&WindowMean::default(), &seed, 3)?;
//!
//! let first = seed.iter().sum::<f64>() / 7.0;
//! assert!((curve.values()[0] - first).abs() < 1e-12);
//!
//! let summary = curve.summarize(102.0)?;
//! assert_eq!(summary.trend.as_str(), "down");
//! # Ok::<(), price_forecast::ForecastError>(())
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use price_forecast::catalog::DemoCatalog;
//! use price_forecast::config::Settings;
//! use price_forecast::data::DataLoader;
//! use price_forecast::registry::ModelRegistry;
//! use price_forecast::service::PriceService;
//!
//! let settings = Settings::default();
//! let dataset = DataLoader::from_csv(&settings.data.dataset_path)?;
//! let (registry, _outcomes) = ModelRegistry::train_configured(&dataset, &settings)?;
//!
//! let service = PriceService::new(settings, DemoCatalog::builtin(), registry, Some(dataset));
//! let card = service.predict("cement")?;
//! # Ok::<(), price_forecast::ForecastError>(())
//! ```

pub mod catalog;
pub mod config;
pub mod data;
pub mod error;
pub mod forecaster;
pub mod metrics;
pub mod models;
pub mod registry;
pub mod series;
pub mod service;
pub mod utils;

// Re-export commonly used types
pub use crate::data::{DataLoader, Dataset, Observation};
pub use crate::error::ForecastError;
pub use crate::forecaster::{forecast, Forecast};
pub use crate::metrics::{summarize, ForecastSummary, Trend};
pub use crate::models::{ForecastModel, Regressor};
pub use crate::series::{aggregate, DailySeries};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
