//! Price service consumed by the dashboard front end
//!
//! Every dependency (settings, demo catalog, model registry, dataset) is
//! handed in at construction. The fallback between trained models and demo
//! figures is decided in [`PriceService::predict`] and nowhere else.

use crate::catalog::{DemoCatalog, MarketOutlook, RiskLevel, Sentiment};
use crate::config::Settings;
use crate::data::Dataset;
use crate::error::{ForecastError, Result};
use crate::forecaster::forecast;
use crate::metrics::Trend;
use crate::models::Regressor;
use crate::registry::ModelRegistry;
use crate::series::{aggregate, DailySeries};
use crate::utils::date_parser::format_date;
use chrono::NaiveDate;
use price_math::round2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Materials shown on the daily price board, in display order
pub const BOARD_ORDER: [&str; 6] = ["steel", "cement", "sand", "gravel", "lumber", "plywood"];

/// Where a prediction's figures came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionSource {
    /// Trained model rolled forward over aggregated history
    Model,
    /// Static demo catalog
    Demo,
}

/// Price card returned for one material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePrediction {
    pub current_price: f64,
    pub pred_7d: f64,
    pub pred_30d: f64,
    pub trend: Trend,
    pub confidence_min: f64,
    pub confidence_max: f64,
    pub confidence_pct: u8,
    pub historical_dates: Vec<String>,
    pub historical_prices: Vec<f64>,
    pub forecast_prices: Vec<f64>,
    pub explanation: String,
    pub source: PredictionSource,
}

/// Purchase cost request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostEstimateRequest {
    pub material: String,
    #[serde(default)]
    pub quantity: f64,
    /// Days until purchase
    #[serde(default)]
    pub timeline: f64,
}

/// Buy-timing advice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "BUY NOW")]
    BuyNow,
    #[serde(rename = "WAIT")]
    Wait,
}

/// Purchase cost now and after the requested timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub current_cost: f64,
    pub predicted_cost: f64,
    pub recommendation: Recommendation,
    pub confidence_pct: u8,
}

/// Market commentary for one material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketInsight {
    pub risk: RiskLevel,
    pub sentiment: Sentiment,
    /// First two bullets joined
    pub insight: String,
    pub all_insights: Vec<String>,
}

/// Entry of the static material listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialListing {
    pub name: String,
    pub price: f64,
    pub updated: String,
}

/// Row of the daily price board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialQuote {
    pub name: String,
    pub price: f64,
    pub unit: String,
    pub updated: String,
}

/// Serves price cards, estimates and listings
#[derive(Debug, Clone)]
pub struct PriceService {
    settings: Settings,
    catalog: DemoCatalog,
    registry: ModelRegistry,
    dataset: Option<Dataset>,
}

impl PriceService {
    pub fn new(
        settings: Settings,
        catalog: DemoCatalog,
        registry: ModelRegistry,
        dataset: Option<Dataset>,
    ) -> Self {
        Self {
            settings,
            catalog,
            registry,
            dataset,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Aggregated daily history of `material`, most recent `days` dates.
    /// Empty when there is no dataset or no data for the material.
    pub fn history(&self, material: &str, days: usize) -> DailySeries {
        match &self.dataset {
            Some(dataset) => aggregate(dataset.observations(), material, Some(days)),
            None => DailySeries::default(),
        }
    }

    /// Price card for `material`.
    ///
    /// Uses the trained model when one is registered and the aggregated
    /// history covers its input window; otherwise serves the demo card.
    /// `Ok(None)` means the material is unknown to both.
    pub fn predict(&self, material: &str) -> Result<Option<PricePrediction>> {
        let Some(model) = self.registry.get(material) else {
            debug!(material, "no trained model, serving demo figures");
            return Ok(self.demo_prediction(material));
        };

        let history = self.history(material, self.settings.forecast.history_days);
        if history.len() < model.lags() {
            info!(
                material,
                days = history.len(),
                lags = model.lags(),
                "history too short for model, serving demo figures"
            );
            return Ok(self.demo_prediction(material));
        }

        self.model_prediction(model.as_ref(), &history).map(Some)
    }

    fn model_prediction(&self, model: &dyn Regressor, history: &DailySeries) -> Result<PricePrediction> {
        let prices = history.prices();
        let current_price = prices
            .last()
            .copied()
            .ok_or_else(|| ForecastError::DataError("History is empty".to_string()))?;

        let curve = forecast(model, &prices, self.settings.forecast.horizon)?;
        let summary = curve.summarize(current_price)?;

        Ok(PricePrediction {
            current_price: round2(current_price),
            pred_7d: summary.pred_7d,
            pred_30d: summary.pred_30d,
            trend: summary.trend,
            confidence_min: summary.confidence_min,
            confidence_max: summary.confidence_max,
            confidence_pct: self.settings.forecast.confidence_pct,
            historical_dates: history.dates(),
            historical_prices: prices,
            forecast_prices: curve.rounded(),
            explanation: format!(
                "{} trained on local historical prices aggregated by date.",
                model.name()
            ),
            source: PredictionSource::Model,
        })
    }

    fn demo_prediction(&self, material: &str) -> Option<PricePrediction> {
        let card = self.catalog.profile(material)?;

        Some(PricePrediction {
            current_price: card.current_price,
            pred_7d: card.predicted_7,
            pred_30d: card.predicted_30,
            trend: card.trend,
            confidence_min: card.confidence_min,
            confidence_max: card.confidence_max,
            confidence_pct: card.confidence_pct,
            historical_dates: card.historical_dates.clone(),
            historical_prices: card.historical_prices.clone(),
            forecast_prices: card.forecast_prices.clone(),
            explanation: "Demo figures compiled from supply/demand and economic indicators."
                .to_string(),
            source: PredictionSource::Demo,
        })
    }

    /// Cost of buying now versus after `timeline` days.
    ///
    /// Prices grow by `estimate.monthly_growth` per 30 days; an unknown
    /// material has a base price of zero.
    pub fn estimate(&self, request: &CostEstimateRequest) -> Result<CostEstimate> {
        if !request.quantity.is_finite() || request.quantity < 0.0 {
            return Err(ForecastError::InvalidInput(format!(
                "Quantity must be a non-negative number, got {}",
                request.quantity
            )));
        }
        if !request.timeline.is_finite() || request.timeline < 0.0 {
            return Err(ForecastError::InvalidInput(format!(
                "Timeline must be a non-negative number of days, got {}",
                request.timeline
            )));
        }

        let base_price = self
            .catalog
            .profile(&request.material)
            .map(|p| p.current_price)
            .unwrap_or(0.0);

        let current_cost = base_price * request.quantity;
        let factor = 1.0 + (request.timeline / 30.0) * self.settings.estimate.monthly_growth;
        let predicted_cost = current_cost * factor;

        let recommendation = if predicted_cost > current_cost {
            Recommendation::BuyNow
        } else {
            Recommendation::Wait
        };

        Ok(CostEstimate {
            current_cost,
            predicted_cost,
            recommendation,
            confidence_pct: self.settings.estimate.confidence_pct,
        })
    }

    /// Market commentary, or the neutral placeholder for unknown materials
    pub fn market_insight(&self, material: &str) -> MarketInsight {
        let outlook = self
            .catalog
            .outlook(material)
            .cloned()
            .unwrap_or_else(MarketOutlook::unavailable);

        MarketInsight {
            risk: outlook.risk,
            sentiment: outlook.sentiment,
            insight: outlook
                .insights
                .iter()
                .take(2)
                .cloned()
                .collect::<Vec<_>>()
                .join(" "),
            all_insights: outlook.insights,
        }
    }

    /// Static listing of demo prices
    pub fn materials(&self) -> Vec<MaterialListing> {
        let updated = format_date(self.catalog.listing_date());
        self.catalog
            .profiles()
            .iter()
            .map(|p| MaterialListing {
                name: p.name.clone(),
                price: p.current_price,
                updated: updated.clone(),
            })
            .collect()
    }

    /// Daily board of average prices.
    ///
    /// Uses observations dated `today`, or the latest dataset date when
    /// there are none. Materials without rows on that date show their demo
    /// price.
    pub fn materials_today(&self, today: NaiveDate) -> Vec<MaterialQuote> {
        let board_date = self.dataset.as_ref().and_then(|dataset| {
            if dataset.has_date(today) {
                Some(today)
            } else {
                dataset.latest_date()
            }
        });

        BOARD_ORDER
            .iter()
            .map(|&material| {
                let observed = self.dataset.as_ref().zip(board_date).and_then(|(dataset, date)| {
                    dataset.mean_price_on(material, date).map(|mean| MaterialQuote {
                        name: capitalize(material),
                        price: round2(mean),
                        unit: dataset.unit_on(material, date).unwrap_or("unit").to_string(),
                        updated: format_date(date),
                    })
                });

                observed.unwrap_or_else(|| MaterialQuote {
                    name: capitalize(material),
                    price: self
                        .catalog
                        .profile(material)
                        .map(|p| p.current_price)
                        .unwrap_or(0.0),
                    unit: "unit".to_string(),
                    updated: format_date(self.catalog.board_fallback_date()),
                })
            })
            .collect()
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("steel"), "Steel");
        assert_eq!(capitalize("PLYWOOD"), "Plywood");
        assert_eq!(capitalize(""), "");
    }
}
