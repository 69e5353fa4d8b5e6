use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use price_forecast::catalog::DemoCatalog;
use price_forecast::config::{ModelKind, Settings};
use price_forecast::data::{DataLoader, Dataset};
use price_forecast::registry::ModelRegistry;
use price_forecast::service::{CostEstimateRequest, PredictionSource, PriceService};
use price_forecast::utils::date_parser::parse_day_first;
use price_forecast::utils::future_dates;
use price_forecast::ForecastError;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "davao-forecast", version, about = "Construction material prices and forecasts")]
struct Cli {
    /// Settings file; defaults apply when it does not exist
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Model family to train (lag_regression or arima), overrides the settings file
    #[arg(long, global = true)]
    model: Option<ModelKind>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Price card with 7/30-day estimates for a material
    Predict { material: String },
    /// Aggregated daily history for a material
    History {
        material: String,
        #[arg(long, default_value_t = 90)]
        days: usize,
    },
    /// Train a model per material and print the evaluation
    Train,
    /// Static material listing
    Materials,
    /// Daily price board
    Today {
        /// Board date, defaults to the local date
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Cost of buying now versus after a number of days
    Estimate {
        material: String,
        quantity: f64,
        /// Days until purchase
        timeline: f64,
    },
    /// Market commentary for a material
    Insight { material: String },
    /// Write a material's model forecast to CSV
    Export {
        material: String,
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Debug, Serialize)]
struct ForecastRow {
    date: String,
    price: f64,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // stdout carries the JSON output, logs go to stderr
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;

    match cli.command {
        Command::Predict { material } => {
            let service = build_service(settings, true)?;
            match service.predict(&material)? {
                Some(card) => print_json(&card)?,
                None => bail!("Material not found: {}", material),
            }
        }
        Command::History { material, days } => {
            let service = build_service(settings, false)?;
            print_json(&service.history(&material, days))?;
        }
        Command::Train => {
            let dataset = load_dataset(&settings)?
                .context("Training needs the price dataset")?;
            let (_, outcomes) = ModelRegistry::train_configured(&dataset, &settings)?;
            print_json(&outcomes)?;
        }
        Command::Materials => {
            let service = build_service(settings, false)?;
            print_json(&service.materials())?;
        }
        Command::Today { date } => {
            let service = build_service(settings, false)?;
            let today = date.unwrap_or_else(|| Local::now().date_naive());
            print_json(&service.materials_today(today))?;
        }
        Command::Estimate {
            material,
            quantity,
            timeline,
        } => {
            let service = build_service(settings, false)?;
            let request = CostEstimateRequest {
                material,
                quantity,
                timeline,
            };
            print_json(&service.estimate(&request)?)?;
        }
        Command::Insight { material } => {
            let service = build_service(settings, false)?;
            print_json(&service.market_insight(&material))?;
        }
        Command::Export { material, out } => {
            let service = build_service(settings, true)?;
            let card = service
                .predict(&material)?
                .with_context(|| format!("Material not found: {}", material))?;

            if card.source != PredictionSource::Model {
                bail!("No trained model forecast for {}", material);
            }

            let last = card
                .historical_dates
                .last()
                .and_then(|d| parse_day_first(d))
                .context("Model forecast without history")?;
            let dates = future_dates(last, card.forecast_prices.len())?;

            let mut writer = csv::Writer::from_path(&out)
                .with_context(|| format!("Failed to create {}", out.display()))?;
            for (date, price) in dates.iter().zip(card.forecast_prices.iter()) {
                writer.serialize(ForecastRow {
                    date: date.format("%Y-%m-%d").to_string(),
                    price: *price,
                })?;
            }
            writer.flush()?;
            tracing::info!("Wrote {} forecast rows to {}", dates.len(), out.display());
        }
    }

    Ok(())
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = if cli.config.exists() {
        Settings::load(&cli.config)
            .with_context(|| format!("Failed to load settings from {}", cli.config.display()))?
    } else {
        tracing::info!("No settings file at {}, using defaults", cli.config.display());
        Settings::default()
    };

    if let Some(model) = cli.model {
        settings.training.model = model;
    }

    settings.apply_env_overrides()?;
    Ok(settings)
}

/// A missing dataset file is an expected state: the service then serves demo figures.
fn load_dataset(settings: &Settings) -> Result<Option<Dataset>> {
    match DataLoader::from_csv(&settings.data.dataset_path) {
        Ok(dataset) => Ok(Some(dataset)),
        Err(ForecastError::IoError(err)) => {
            tracing::warn!(
                "Dataset {} unavailable ({}), serving demo figures",
                settings.data.dataset_path,
                err
            );
            Ok(None)
        }
        Err(err) => Err(err)
            .with_context(|| format!("Failed to read dataset {}", settings.data.dataset_path)),
    }
}

fn build_service(settings: Settings, train: bool) -> Result<PriceService> {
    let dataset = load_dataset(&settings)?;

    let registry = match (&dataset, train) {
        (Some(dataset), true) => ModelRegistry::train_configured(dataset, &settings)?.0,
        _ => ModelRegistry::new(),
    };
    tracing::info!("Models loaded: {}", registry.len());

    Ok(PriceService::new(settings, DemoCatalog::builtin(), registry, dataset))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
