//! Utility functions for the price_forecast crate

use crate::data::Observation;
use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Date parsing with day-before-month interpretation
pub mod date_parser {
    use chrono::NaiveDate;

    /// Output format for every date leaving the crate
    pub const OUTPUT_FORMAT: &str = "%Y-%m-%d";

    /// Accepted layouts, tried in order. Two-digit years come first so that
    /// `01/02/26` is not read as year 26.
    const INPUT_FORMATS: [&str; 9] = [
        "%d/%m/%y", "%d-%m-%y", "%d.%m.%y",
        "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y",
        "%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d",
    ];

    /// Parse a dataset date, day before month.
    ///
    /// Accepts `DD/MM/YYYY`, `DD-MM-YY`, `DD.MM.YYYY` and ISO `YYYY-MM-DD`.
    /// A trailing time part (`T...` or after a space) is ignored. Returns
    /// `None` when the text is not a valid calendar date.
    pub fn parse_day_first(raw: &str) -> Option<NaiveDate> {
        let date_part = raw.trim().split(['T', ' ']).next()?;
        if date_part.is_empty() {
            return None;
        }

        INPUT_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
    }

    /// Render a date as `YYYY-MM-DD`
    pub fn format_date(date: NaiveDate) -> String {
        date.format(OUTPUT_FORMAT).to_string()
    }
}

/// Consecutive calendar days following `last`
pub fn future_dates(last: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    (1..=horizon as u64)
        .map(|offset| {
            last.checked_add_days(Days::new(offset)).ok_or_else(|| {
                ForecastError::ValidationError(format!(
                    "Date overflow {} days after {}",
                    offset, last
                ))
            })
        })
        .collect()
}

/// Split row indices into shuffled training and test sets.
///
/// The shuffle is seeded, so the same `seed` always yields the same split.
/// The test set holds `ceil(len * test_ratio)` rows.
pub fn train_test_split_shuffled(
    len: usize,
    test_ratio: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(ForecastError::ValidationError(format!(
            "Test ratio must be between 0 and 1, got {}",
            test_ratio
        )));
    }

    let test_size = (len as f64 * test_ratio).ceil() as usize;
    if test_size == 0 || test_size >= len {
        return Err(ForecastError::DataError(format!(
            "Cannot split {} rows with test ratio {}",
            len, test_ratio
        )));
    }

    let mut indices: Vec<usize> = (0..len).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test = indices[..test_size].to_vec();
    let train = indices[test_size..].to_vec();

    Ok((train, test))
}

/// Generate a seeded random walk of daily observations for one material.
///
/// Each day carries `readings_per_day` observations scattered around the
/// day's level, dated in `DD/MM/YYYY` form like the field dataset.
///
/// # Arguments
/// * `material` - Material identifier stamped on every observation
/// * `start` - First calendar day
/// * `days` - Number of days to generate
/// * `starting_price` - Level on the first day
/// * `volatility` - Daily relative standard deviation (e.g. 0.01)
/// * `readings_per_day` - Observations per day (at least 1)
/// * `seed` - RNG seed
pub fn synthetic_observations(
    material: &str,
    start: NaiveDate,
    days: usize,
    starting_price: f64,
    volatility: f64,
    readings_per_day: usize,
    seed: u64,
) -> Result<Vec<Observation>> {
    let step = Normal::new(0.0, volatility).map_err(|e| {
        ForecastError::ValidationError(format!("Invalid volatility {}: {}", volatility, e))
    })?;
    let scatter = Normal::new(0.0, volatility / 2.0).map_err(|e| {
        ForecastError::ValidationError(format!("Invalid volatility {}: {}", volatility, e))
    })?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut level = starting_price;
    let mut observations = Vec::with_capacity(days * readings_per_day.max(1));

    for day in 0..days {
        let date = start
            .checked_add_days(Days::new(day as u64))
            .ok_or_else(|| ForecastError::ValidationError("Date overflow".to_string()))?;
        let date_text = date.format("%d/%m/%Y").to_string();

        for _ in 0..readings_per_day.max(1) {
            let price = level * (1.0 + scatter.sample(&mut rng));
            observations.push(Observation::new(&date_text, material, price).with_unit("unit"));
        }

        level *= 1.0 + step.sample(&mut rng);
        level = level.max(1.0);
    }

    Ok(observations)
}
