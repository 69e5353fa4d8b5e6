//! Price observations and dataset loading

use crate::error::{ForecastError, Result};
use crate::utils::date_parser::parse_day_first;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// One price reading for a material.
///
/// The date is kept as the raw dataset text; it is parsed (day first) only
/// when series are aggregated, and readings whose date cannot be parsed are
/// ignored there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Raw date text, e.g. `01/02/2026`
    pub date: String,
    /// Material identifier, e.g. `cement`
    pub material: String,
    /// Observed price
    pub price: f64,
    /// Unit of sale, when the dataset records one
    pub unit: Option<String>,
}

impl Observation {
    /// Create an observation without a unit
    pub fn new(date: &str, material: &str, price: f64) -> Self {
        Self {
            date: date.to_string(),
            material: material.to_string(),
            price,
            unit: None,
        }
    }

    /// Attach a unit of sale
    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    /// The calendar date, if the raw text parses
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_day_first(&self.date)
    }
}

/// An immutable snapshot of observations
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    observations: Vec<Observation>,
}

impl Dataset {
    /// Wrap a set of observations
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    /// All observations in load order
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Check if the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Distinct materials in first-seen order
    pub fn materials(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.observations
            .iter()
            .filter(|o| seen.insert(o.material.as_str()))
            .map(|o| o.material.clone())
            .collect()
    }

    /// Latest parseable date across all materials
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.observations
            .iter()
            .filter_map(Observation::parsed_date)
            .max()
    }

    /// Whether any observation falls on `date`
    pub fn has_date(&self, date: NaiveDate) -> bool {
        self.observations
            .iter()
            .any(|o| o.parsed_date() == Some(date))
    }

    /// Unrounded mean price of `material` on `date`
    pub fn mean_price_on(&self, material: &str, date: NaiveDate) -> Option<f64> {
        let (sum, count) = self
            .on_date(material, date)
            .fold((0.0, 0usize), |(sum, count), o| (sum + o.price, count + 1));

        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }

    /// Unit of the first observation of `material` on `date`
    pub fn unit_on(&self, material: &str, date: NaiveDate) -> Option<&str> {
        self.on_date(material, date)
            .next()
            .and_then(|o| o.unit.as_deref())
    }

    fn on_date<'a, 'm>(
        &'a self,
        material: &'m str,
        date: NaiveDate,
    ) -> impl Iterator<Item = &'a Observation> + 'm
    where
        'a: 'm,
    {
        self.observations
            .iter()
            .filter(move |o| o.material == material && o.parsed_date() == Some(date))
    }
}

/// Data loader for the materials price dataset
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load observations from a CSV file with `date`, `material`, `price`
    /// and optional `unit` columns.
    ///
    /// Column names are matched case-insensitively. Rows without a material
    /// or a numeric price are skipped.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        let dataset = Self::from_dataframe(&df)?;
        info!(
            path = %path.display(),
            rows = df.height(),
            observations = dataset.len(),
            "loaded price dataset"
        );

        Ok(dataset)
    }

    /// Build a dataset from observations already in memory
    pub fn from_observations(observations: Vec<Observation>) -> Dataset {
        Dataset::new(observations)
    }

    /// Extract observations from a DataFrame
    pub fn from_dataframe(df: &DataFrame) -> Result<Dataset> {
        let date_col = Self::detect_column(df, "date")?;
        let material_col = Self::detect_column(df, "material")?;
        let price_col = Self::detect_column(df, "price")?;
        let unit_col = Self::detect_column(df, "unit").ok();

        let dates = df.column(&date_col)?.cast(&DataType::Utf8)?;
        let materials = df.column(&material_col)?.cast(&DataType::Utf8)?;
        let prices = df.column(&price_col)?.cast(&DataType::Float64)?;

        let units: Vec<Option<String>> = match unit_col {
            Some(name) => {
                let series = df.column(&name)?.cast(&DataType::Utf8)?;
                series
                    .utf8()?
                    .into_iter()
                    .map(|u| u.map(|s| s.trim().to_string()))
                    .collect()
            }
            None => vec![None; df.height()],
        };

        let mut observations = Vec::with_capacity(df.height());
        let mut skipped = 0usize;

        let rows = dates
            .utf8()?
            .into_iter()
            .zip(materials.utf8()?.into_iter())
            .zip(prices.f64()?.into_iter())
            .zip(units);

        for (((date, material), price), unit) in rows {
            match (material, price) {
                (Some(material), Some(price)) if price.is_finite() => {
                    observations.push(Observation {
                        date: date.unwrap_or_default().to_string(),
                        material: material.trim().to_string(),
                        price,
                        unit,
                    });
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!(skipped, "skipped rows without material or numeric price");
        }

        Ok(Dataset::new(observations))
    }

    /// Find a column by name, preferring an exact case-insensitive match
    fn detect_column(df: &DataFrame, wanted: &str) -> Result<String> {
        let column_names = df.get_column_names();

        let exact = column_names
            .iter()
            .find(|name| name.trim().eq_ignore_ascii_case(wanted));
        let partial = || {
            column_names
                .iter()
                .find(|name| name.to_lowercase().contains(wanted))
        };

        exact
            .or_else(partial)
            .map(|name| name.to_string())
            .ok_or_else(|| ForecastError::DataError(format!("No {} column found in data", wanted)))
    }
}
