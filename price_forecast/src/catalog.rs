//! Static demo figures served when no trained model or history exists
//!
//! The catalog is an ordinary value built once by the caller and handed to
//! the [`PriceService`](crate::service::PriceService); nothing here is global.

use crate::metrics::Trend;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Weekly sample dates shared by every demo history
const DEMO_HISTORY_DATES: [&str; 4] = ["2026-02-01", "2026-02-08", "2026-02-15", "2026-02-22"];

/// Demo price card for one material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProfile {
    /// Material identifier
    pub name: String,
    /// Current price
    pub current_price: f64,
    /// 7-day estimate
    pub predicted_7: f64,
    /// 30-day estimate
    pub predicted_30: f64,
    /// Trend label
    pub trend: Trend,
    /// Lower band
    pub confidence_min: f64,
    /// Upper band
    pub confidence_max: f64,
    /// Confidence percentage
    pub confidence_pct: u8,
    /// Weekly history dates, `YYYY-MM-DD`
    pub historical_dates: Vec<String>,
    /// Weekly history prices
    pub historical_prices: Vec<f64>,
    /// Short forecast curve
    pub forecast_prices: Vec<f64>,
}

/// Qualitative market risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Qualitative market sentiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// Market commentary for one material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOutlook {
    pub risk: RiskLevel,
    pub sentiment: Sentiment,
    pub insights: Vec<String>,
}

impl MarketOutlook {
    /// Outlook used for materials without commentary
    pub fn unavailable() -> Self {
        Self {
            risk: RiskLevel::Medium,
            sentiment: Sentiment::Neutral,
            insights: vec!["Market data unavailable for this material.".to_string()],
        }
    }
}

/// Demo price cards and market commentary
#[derive(Debug, Clone)]
pub struct DemoCatalog {
    profiles: Vec<MaterialProfile>,
    outlooks: HashMap<String, MarketOutlook>,
    listing_date: NaiveDate,
    board_fallback_date: NaiveDate,
}

impl DemoCatalog {
    /// Build a catalog from explicit parts
    pub fn new(
        profiles: Vec<MaterialProfile>,
        outlooks: HashMap<String, MarketOutlook>,
        listing_date: NaiveDate,
        board_fallback_date: NaiveDate,
    ) -> Self {
        Self {
            profiles,
            outlooks,
            listing_date,
            board_fallback_date,
        }
    }

    /// An empty catalog; every lookup misses
    pub fn empty(listing_date: NaiveDate) -> Self {
        Self::new(Vec::new(), HashMap::new(), listing_date, listing_date)
    }

    /// The six Davao materials with their dashboard demo figures
    pub fn builtin() -> Self {
        let profiles = vec![
            profile("plywood", 310.0, 315.0, 325.0, Trend::Up, (305.0, 335.0), 85,
                [310.0, 310.0, 312.0, 310.0], [315.0, 318.0, 321.0]),
            profile("cement", 244.5, 252.0, 271.0, Trend::Up, (240.0, 280.0), 87,
                [244.5, 246.0, 248.0, 244.0], [252.0, 258.0, 264.0]),
            profile("steel", 186.0, 194.5, 202.0, Trend::Up, (180.0, 210.0), 92,
                [186.0, 187.0, 188.0, 186.0], [194.5, 198.0, 202.0]),
            profile("lumber", 98.0, 101.0, 109.0, Trend::Stable, (95.0, 110.0), 78,
                [98.0, 98.0, 99.0, 98.0], [101.0, 105.0, 109.0]),
            profile("gravel", 72.5, 73.5, 75.0, Trend::Stable, (70.0, 78.0), 81,
                [72.5, 72.5, 73.0, 72.5], [73.5, 74.0, 75.0]),
            profile("sand", 85.0, 86.0, 88.0, Trend::Up, (83.0, 91.0), 79,
                [85.0, 85.0, 85.5, 85.0], [86.0, 87.0, 88.0]),
        ];

        let outlooks = [
            ("steel", RiskLevel::Medium, Sentiment::Negative, [
                "Rising fuel costs impact transport and logistics expenses.",
                "Global steel prices showing downward trend due to market oversupply.",
                "Recommend locking in prices for short-term projects.",
                "Q1 2026 demand in Davao region remains below forecast.",
            ]),
            ("cement", RiskLevel::High, Sentiment::Negative, [
                "Construction demand weakening; expect price adjustments.",
                "Supply chain delays reported in Metro Manila affecting Davao shipments.",
                "Bulk orders may receive 5-10% discount.",
                "Advocate for price lock agreements until Q2.",
            ]),
            ("sand", RiskLevel::Low, Sentiment::Neutral, [
                "Stable local demand from ongoing residential projects.",
                "Local suppliers maintaining consistent pricing.",
                "No supply disruptions expected in the near term.",
                "Good opportunity for long-term procurement contracts.",
            ]),
            ("gravel", RiskLevel::Low, Sentiment::Positive, [
                "Quarry output increasing as weather improves.",
                "Competitive pricing from multiple local suppliers.",
                "Average price decline of 2% expected in next 30 days.",
                "Ideal time for infrastructure projects requiring bulk materials.",
            ]),
            ("lumber", RiskLevel::Medium, Sentiment::Neutral, [
                "Import delays affecting premium lumber grades.",
                "Local production maintaining steady supply.",
                "Mixed market sentiment on construction demand.",
                "Price volatility expected due to sourcing challenges.",
            ]),
            ("plywood", RiskLevel::Medium, Sentiment::Positive, [
                "Strong demand from residential sector driving prices up.",
                "Regional production capacity increasing through Q2.",
                "Recommended for shorter procurement cycles.",
                "Export demand supporting stable pricing structure.",
            ]),
        ]
        .into_iter()
        .map(|(name, risk, sentiment, insights)| {
            (
                name.to_string(),
                MarketOutlook {
                    risk,
                    sentiment,
                    insights: insights.iter().map(|s| s.to_string()).collect(),
                },
            )
        })
        .collect();

        Self::new(
            profiles,
            outlooks,
            NaiveDate::from_ymd_opt(2026, 2, 24).unwrap_or_default(),
            NaiveDate::from_ymd_opt(2026, 2, 25).unwrap_or_default(),
        )
    }

    /// Demo card for `material`
    pub fn profile(&self, material: &str) -> Option<&MaterialProfile> {
        self.profiles.iter().find(|p| p.name == material)
    }

    /// All demo cards in catalog order
    pub fn profiles(&self) -> &[MaterialProfile] {
        &self.profiles
    }

    /// Commentary for `material`, if any
    pub fn outlook(&self, material: &str) -> Option<&MarketOutlook> {
        self.outlooks.get(material)
    }

    /// Date stamped on the static material listing
    pub fn listing_date(&self) -> NaiveDate {
        self.listing_date
    }

    /// Date stamped on board rows that fall back to demo prices
    pub fn board_fallback_date(&self) -> NaiveDate {
        self.board_fallback_date
    }
}

#[allow(clippy::too_many_arguments)]
fn profile(
    name: &str,
    current_price: f64,
    predicted_7: f64,
    predicted_30: f64,
    trend: Trend,
    (confidence_min, confidence_max): (f64, f64),
    confidence_pct: u8,
    history: [f64; 4],
    forecast: [f64; 3],
) -> MaterialProfile {
    MaterialProfile {
        name: name.to_string(),
        current_price,
        predicted_7,
        predicted_30,
        trend,
        confidence_min,
        confidence_max,
        confidence_pct,
        historical_dates: DEMO_HISTORY_DATES.iter().map(|d| d.to_string()).collect(),
        historical_prices: history.to_vec(),
        forecast_prices: forecast.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_materials() {
        let catalog = DemoCatalog::builtin();
        let names: Vec<&str> = catalog.profiles().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["plywood", "cement", "steel", "lumber", "gravel", "sand"]
        );
        assert!(catalog.profiles().iter().all(|p| catalog.outlook(&p.name).is_some()));
    }

    #[test]
    fn test_profile_lookup() {
        let catalog = DemoCatalog::builtin();
        let cement = catalog.profile("cement").unwrap();
        assert_eq!(cement.current_price, 244.5);
        assert_eq!(cement.historical_dates.len(), cement.historical_prices.len());
        assert!(catalog.profile("marble").is_none());
    }

    #[test]
    fn test_empty_catalog() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let catalog = DemoCatalog::empty(date);
        assert!(catalog.profile("cement").is_none());
        assert_eq!(catalog.board_fallback_date(), date);
    }
}
