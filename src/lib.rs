//! # Davao Build
//!
//! Facade over the workspace crates that price construction materials for the
//! regional market dashboard.
//!
//! ## Example
//!
//! ```
//! use davao_build_workspace::price_forecast::forecaster::forecast;
//! use davao_build_workspace::price_forecast::models::window_mean::WindowMean;
//!
//! let seed = [100.0, 101.0, 100.0, 102.0, 101.0, 103.0, 102.0];
//! let curve = forecast(&WindowMean::default(), &seed, 3).unwrap();
//! assert_eq!(curve.len(), 3);
//! ```

pub use price_forecast;
pub use price_math;

/// Forecast horizon used by the dashboard when none is configured.
pub const DEFAULT_HORIZON: usize = price_forecast::config::DEFAULT_HORIZON;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_horizon_is_thirty_days() {
        assert_eq!(DEFAULT_HORIZON, 30);
    }

    #[test]
    fn test_rounding_is_reexported() {
        assert_eq!(price_math::round2(101.2857_f64), 101.29);
    }
}
