use assert_approx_eq::assert_approx_eq;
use price_forecast::forecaster::forecast;
use price_forecast::models::arima::Arima;
use price_forecast::models::lag_regression::{featurize, LagRegression};
use price_forecast::models::window_mean::WindowMean;
use price_forecast::{ForecastError, ForecastModel, Regressor};

/// Seasonal price curve, exactly linear in its own lags
fn seasonal_series(len: usize) -> Vec<f64> {
    (0..len).map(|t| 100.0 + 10.0 * (t as f64 * 0.3).sin()).collect()
}

#[test]
fn test_lag_regression_learns_seasonal_curve() {
    let series = seasonal_series(120);
    let trainer = LagRegression::new(7).unwrap();

    let trained = trainer.train(&series).unwrap();
    let report = trained.training_report().unwrap();

    assert_eq!(report.samples, 113);
    assert_eq!(report.train_rows + report.test_rows, report.samples);
    assert_eq!(report.test_rows, 23);
    assert!(report.r_squared > 0.95, "r_squared = {}", report.r_squared);

    let next = trained.predict(&series[113..]).unwrap();
    let truth = 100.0 + 10.0 * (120.0_f64 * 0.3).sin();
    assert_approx_eq!(next, truth, 0.5);
}

#[test]
fn test_lag_regression_training_is_deterministic() {
    let series = seasonal_series(90);
    let trainer = LagRegression::new(7).unwrap().with_seed(7);

    let first = trainer.train(&series).unwrap();
    let second = trainer.train(&series).unwrap();

    assert_eq!(first.fit(), second.fit());
    assert_eq!(first.fit().n_features(), 7);
}

#[test]
fn test_lag_regression_needs_min_samples() {
    let series = seasonal_series(40);
    let result = LagRegression::new(7).unwrap().train(&series);
    assert!(matches!(result, Err(ForecastError::DataError(_))));

    let relaxed = LagRegression::new(7).unwrap().with_min_samples(20);
    assert!(relaxed.train(&series).is_ok());
}

#[test]
fn test_lag_regression_rejects_bad_parameters() {
    assert!(LagRegression::new(0).is_err());
    assert!(LagRegression::new(7).unwrap().with_test_ratio(0.0).is_err());
    assert!(LagRegression::new(7).unwrap().with_test_ratio(1.0).is_err());
    assert!(LagRegression::new(7).unwrap().with_ridge(-1.0).is_err());
}

#[test]
fn test_lag_regression_rejects_non_finite_prices() {
    let mut series = seasonal_series(80);
    series[10] = f64::INFINITY;
    let result = LagRegression::new(7).unwrap().train(&series);
    assert!(matches!(result, Err(ForecastError::InvalidInput(_))));
}

#[test]
fn test_trained_model_checks_window_length() {
    let trained = LagRegression::new(7)
        .unwrap()
        .train(&seasonal_series(80))
        .unwrap();

    assert!(matches!(
        trained.predict(&[100.0; 6]),
        Err(ForecastError::InvalidInput(_))
    ));
    assert_eq!(trained.lags(), 7);
}

#[test]
fn test_trained_model_rolls_forward() {
    let series = seasonal_series(120);
    let trained = LagRegression::new(7).unwrap().train(&series).unwrap();

    let curve = forecast(&trained, &series, 30).unwrap();
    assert_eq!(curve.len(), 30);
    assert!(curve.values().iter().all(|v| v.is_finite()));
}

#[test]
fn test_featurize_rows_match_forecast_windows() {
    let series = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
    let (rows, targets) = featurize(&series, 7);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], series[..7].to_vec());
    assert_eq!(targets, vec![8.0, 9.0]);
}

#[test]
fn test_window_mean_training() {
    let model = WindowMean::default();
    assert!(model.train(&[1.0, 2.0, 3.0]).is_err());

    let trained = model.train(&[1.0; 7]).unwrap();
    assert_approx_eq!(trained.predict(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]).unwrap(), 4.0);
    assert!(WindowMean::new(0).is_err());
}

#[test]
fn test_arima_follows_seasonal_differences() {
    // differences of a sampled sinusoid obey an exact AR(2) recursion
    let series = seasonal_series(121);
    let trained = Arima::new(2, 0).unwrap().train(&series[..120]).unwrap();

    assert_eq!(Regressor::name(&trained), "ARIMA(2,1,0)");
    let next = trained.predict(&series[113..120]).unwrap();
    assert_approx_eq!(next, series[120], 1e-3);
}

#[test]
fn test_arima_rolls_forward() {
    let series = seasonal_series(60);
    let trained = Arima::default().train(&series).unwrap();

    let curve = forecast(&trained, &series, 30).unwrap();
    assert_eq!(curve.len(), 30);
    assert!(curve.values().iter().all(|v| v.is_finite()));
}

#[test]
fn test_arima_needs_ten_prices() {
    let series = seasonal_series(9);
    assert!(matches!(
        Arima::default().train(&series),
        Err(ForecastError::DataError(_))
    ));

    let mut series = seasonal_series(20);
    series[4] = f64::NAN;
    assert!(matches!(
        Arima::default().train(&series),
        Err(ForecastError::InvalidInput(_))
    ));
}
