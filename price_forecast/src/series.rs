//! Daily price series aggregation
//!
//! Observations are grouped per calendar date and averaged. The resulting
//! series is strictly ascending by date with one entry per date, and is
//! recomputed from the observations on every call.

use crate::data::Observation;
use crate::utils::date_parser::format_date;
use chrono::NaiveDate;
use price_math::round2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

/// Average price of one material on one calendar date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyPrice {
    /// Calendar date
    pub date: NaiveDate,
    /// Arithmetic mean of that day's observations
    pub price: f64,
}

/// Ordered daily prices for one material
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    points: Vec<DailyPrice>,
}

impl DailySeries {
    /// All points, oldest first
    pub fn points(&self) -> &[DailyPrice] {
        &self.points
    }

    /// Number of dates in the series
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// An empty series means "no data available" for the material
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Dates rendered as `YYYY-MM-DD`
    pub fn dates(&self) -> Vec<String> {
        self.points.iter().map(|p| format_date(p.date)).collect()
    }

    /// Prices, oldest first
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    /// Most recent point
    pub fn last(&self) -> Option<&DailyPrice> {
        self.points.last()
    }

    /// Keep only the trailing `n` points
    pub fn tail(mut self, n: usize) -> Self {
        let drop = self.points.len().saturating_sub(n);
        self.points.drain(..drop);
        self
    }
}

/// Group a material's observations by date and average them, unrounded.
///
/// Observations for other materials, and those whose date cannot be parsed,
/// are ignored.
pub fn daily_means(observations: &[Observation], material: &str) -> DailySeries {
    let mut by_date: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    let mut dropped = 0usize;

    for obs in observations.iter().filter(|o| o.material == material) {
        match obs.parsed_date() {
            Some(date) => {
                let entry = by_date.entry(date).or_insert((0.0, 0));
                entry.0 += obs.price;
                entry.1 += 1;
            }
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        trace!(material, dropped, "ignored observations with unparseable dates");
    }

    let points = by_date
        .into_iter()
        .map(|(date, (sum, count))| DailyPrice {
            date,
            price: sum / count as f64,
        })
        .collect();

    DailySeries { points }
}

/// Daily average prices of `material`, ascending by date, rounded to cents.
///
/// When `max_days` is given only the most recent `max_days` dates are kept.
/// A material with no usable observations yields an empty series.
pub fn aggregate(
    observations: &[Observation],
    material: &str,
    max_days: Option<usize>,
) -> DailySeries {
    let mut series = daily_means(observations, material);

    if let Some(n) = max_days {
        series = series.tail(n);
    }

    for point in series.points.iter_mut() {
        point.price = round2(point.price);
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_keeps_most_recent() {
        let obs = vec![
            Observation::new("01/01/2026", "sand", 1.0),
            Observation::new("02/01/2026", "sand", 2.0),
            Observation::new("03/01/2026", "sand", 3.0),
        ];
        let series = aggregate(&obs, "sand", Some(2));
        assert_eq!(series.prices(), vec![2.0, 3.0]);
        assert_eq!(series.dates(), vec!["2026-01-02", "2026-01-03"]);
    }

    #[test]
    fn test_zero_max_days_is_empty() {
        let obs = vec![Observation::new("01/01/2026", "sand", 1.0)];
        assert!(aggregate(&obs, "sand", Some(0)).is_empty());
    }

    #[test]
    fn test_daily_means_unrounded() {
        let obs = vec![
            Observation::new("01/01/2026", "sand", 1.0),
            Observation::new("01/01/2026", "sand", 1.0),
            Observation::new("01/01/2026", "sand", 2.0),
        ];
        let means = daily_means(&obs, "sand");
        assert_eq!(means.prices(), vec![4.0 / 3.0]);
        assert_eq!(aggregate(&obs, "sand", None).prices(), vec![1.33]);
    }
}
