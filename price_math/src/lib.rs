//! # Price Math
//!
//! Numeric building blocks for material price forecasting.
//! This crate provides decimal rounding, summary statistics and the
//! regularised least-squares solver used to fit lag regressors.

use thiserror::Error;

pub mod regression;
pub mod rounding;
pub mod stats;

pub use regression::{least_squares, LinearFit};
pub use rounding::{round2, round_to};

/// Errors that can occur in price calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for price math operations
pub type Result<T> = std::result::Result<T, MathError>;
