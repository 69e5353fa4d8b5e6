//! Per-material model lookup
//!
//! Built once at start-up and injected into the service. A missing entry is
//! the ordinary "no model" outcome, not an error.

use crate::config::{ModelKind, Settings};
use crate::data::Dataset;
use crate::error::Result;
use crate::models::{ForecastModel, Regressor, TrainingReport};
use crate::series::daily_means;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared handle to a trained regressor
pub type ModelHandle = Arc<dyn Regressor>;

/// Result of training one material
#[derive(Debug, Clone, Serialize)]
pub struct TrainingOutcome {
    /// Material identifier
    pub material: String,
    /// Daily points available for training
    pub days: usize,
    /// Model name when training succeeded
    pub model: Option<String>,
    /// Held-out evaluation when the model records one
    pub report: Option<TrainingReport>,
    /// Why the material was skipped
    pub skipped: Option<String>,
}

/// Mapping from material identifier to trained model
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: HashMap<String, ModelHandle>,
}

impl ModelRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the model for `material`
    pub fn insert(&mut self, material: &str, model: ModelHandle) {
        self.models.insert(material.to_string(), model);
    }

    /// Builder-style [`ModelRegistry::insert`]
    pub fn with_model(mut self, material: &str, model: ModelHandle) -> Self {
        self.insert(material, model);
        self
    }

    /// The model for `material`, if one was trained
    pub fn get(&self, material: &str) -> Option<ModelHandle> {
        self.models.get(material).cloned()
    }

    /// Whether `material` has a model
    pub fn contains(&self, material: &str) -> bool {
        self.models.contains_key(material)
    }

    /// Materials with a model, sorted
    pub fn materials(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered models
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Train one model per material found in `dataset`.
    ///
    /// Materials whose training fails are logged and left out of the
    /// registry; their outcome carries the reason.
    pub fn train<M: ForecastModel>(dataset: &Dataset, trainer: &M) -> (Self, Vec<TrainingOutcome>) {
        let mut registry = Self::new();
        let mut outcomes = Vec::new();

        for material in dataset.materials() {
            let series = daily_means(dataset.observations(), &material).prices();

            match trainer.train(&series) {
                Ok(trained) => {
                    info!(material = %material, model = trained.name(), days = series.len(), "trained model");
                    outcomes.push(TrainingOutcome {
                        material: material.clone(),
                        days: series.len(),
                        model: Some(trained.name().to_string()),
                        report: trained.training_report().cloned(),
                        skipped: None,
                    });
                    registry.insert(&material, Arc::new(trained));
                }
                Err(err) => {
                    warn!(material = %material, error = %err, "skipping material");
                    outcomes.push(TrainingOutcome {
                        material: material.clone(),
                        days: series.len(),
                        model: None,
                        report: None,
                        skipped: Some(err.to_string()),
                    });
                }
            }
        }

        (registry, outcomes)
    }

    /// Train with the model family selected in `[training] model`
    pub fn train_configured(
        dataset: &Dataset,
        settings: &Settings,
    ) -> Result<(Self, Vec<TrainingOutcome>)> {
        let trained = match settings.training.model {
            ModelKind::LagRegression => Self::train(dataset, &settings.trainer()?),
            ModelKind::Arima => Self::train(dataset, &settings.arima_trainer()?),
        };
        Ok(trained)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Observation;
    use crate::models::window_mean::WindowMean;

    #[test]
    fn test_train_skips_short_series() {
        let mut observations: Vec<Observation> = (1..=9)
            .map(|d| Observation::new(&format!("{:02}/01/2026", d), "cement", 240.0 + d as f64))
            .collect();
        observations.push(Observation::new("01/01/2026", "sand", 85.0));

        let (registry, outcomes) = ModelRegistry::train(&Dataset::new(observations), &WindowMean::default());

        assert!(registry.contains("cement"));
        assert!(!registry.contains("sand"));
        assert_eq!(registry.materials(), vec!["cement"]);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[1].skipped.is_some());
        assert_eq!(outcomes[0].days, 9);
    }

    #[test]
    fn test_train_configured_arima() {
        let observations: Vec<Observation> = (1..=12)
            .map(|d| Observation::new(&format!("{:02}/01/2026", d), "sand", 80.0 + d as f64 * 0.5))
            .collect();
        let mut settings = Settings::default();
        settings.training.model = ModelKind::Arima;

        let (registry, outcomes) =
            ModelRegistry::train_configured(&Dataset::new(observations), &settings).unwrap();

        assert!(registry.contains("sand"));
        assert_eq!(outcomes[0].model.as_deref(), Some("ARIMA(1,1,1)"));
    }

    #[test]
    fn test_get_missing_is_none() {
        let registry = ModelRegistry::new().with_model("steel", Arc::new(WindowMean::default()));
        assert!(registry.get("steel").is_some());
        assert!(registry.get("cement").is_none());
        assert_eq!(registry.len(), 1);
    }
}
