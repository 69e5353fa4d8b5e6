use assert_approx_eq::assert_approx_eq;
use price_forecast::metrics::{forecast_accuracy, summarize, Trend};
use price_forecast::ForecastError;
use price_math::round2;
use rstest::rstest;

#[rstest]
#[case(105.0, Trend::Up)]
#[case(95.0, Trend::Down)]
#[case(100.0, Trend::Stable)]
fn test_trend_against_current_price(#[case] level: f64, #[case] expected: Trend) {
    let values = vec![level; 30];
    let summary = summarize(&values, 100.0).unwrap();
    assert_eq!(summary.trend, expected);
}

#[test]
fn test_trend_labels_serialize_lowercase() {
    assert_eq!(serde_json::to_string(&Trend::Up).unwrap(), "\"up\"");
    assert_eq!(serde_json::to_string(&Trend::Down).unwrap(), "\"down\"");
    assert_eq!(serde_json::to_string(&Trend::Stable).unwrap(), "\"stable\"");
    assert_eq!(Trend::Down.to_string(), "down");
}

#[test]
fn test_point_estimates_use_steps_seven_and_thirty() {
    let values: Vec<f64> = (1..=30).map(|i| 100.0 + i as f64 * 0.5).collect();
    let summary = summarize(&values, 100.0).unwrap();

    assert_eq!(summary.pred_7d, 103.5);
    assert_eq!(summary.pred_30d, 115.0);
}

#[test]
fn test_confidence_band_formula() {
    let values: Vec<f64> = (0..30).map(|i| 90.0 + (i as f64 * 1.37) % 17.0).collect();
    let summary = summarize(&values, 95.0).unwrap();

    let low = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let high = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    assert_eq!(summary.confidence_min, round2(low * 0.98));
    assert_eq!(summary.confidence_max, round2(high * 1.02));
}

#[test]
fn test_confidence_band_ignores_steps_after_thirty() {
    let mut values = vec![100.0; 45];
    values[35] = 1000.0;
    values[40] = 1.0;

    let summary = summarize(&values, 100.0).unwrap();
    assert_eq!(summary.confidence_min, 98.0);
    assert_eq!(summary.confidence_max, 102.0);
}

#[test]
fn test_short_forecast_clamps_estimates() {
    let summary = summarize(&[101.0, 102.0, 103.0], 100.0).unwrap();
    assert_eq!(summary.pred_7d, 101.0);
    assert_eq!(summary.pred_30d, 103.0);
    assert_eq!(summary.confidence_min, round2(101.0 * 0.98));
    assert_eq!(summary.confidence_max, round2(103.0 * 1.02));

    let values: Vec<f64> = (1..=10).map(f64::from).collect();
    let summary = summarize(&values, 5.0).unwrap();
    assert_eq!(summary.pred_7d, 7.0);
    assert_eq!(summary.pred_30d, 10.0);
    assert_eq!(summary.trend, Trend::Up);
}

#[test]
fn test_summarize_rejects_empty_forecast() {
    assert!(matches!(
        summarize(&[], 100.0),
        Err(ForecastError::InvalidInput(_))
    ));
}

#[test]
fn test_summarize_rejects_non_finite_price() {
    assert!(matches!(
        summarize(&[100.0], f64::NAN),
        Err(ForecastError::InvalidInput(_))
    ));
}

#[test]
fn test_forecast_accuracy() {
    let forecast = vec![10.0, 20.0, 30.0, 40.0];
    let actual = vec![12.0, 18.0, 33.0, 40.0];

    let accuracy = forecast_accuracy(&forecast, &actual).unwrap();
    assert_approx_eq!(accuracy.mae, 1.75);
    assert_approx_eq!(accuracy.mse, 4.25);
    assert_approx_eq!(accuracy.rmse, 4.25_f64.sqrt());
    assert!(accuracy.mape > 0.0);
    assert!(accuracy.smape > 0.0);
    assert!(accuracy.to_string().contains("RMSE"));
}

#[test]
fn test_forecast_accuracy_length_mismatch() {
    assert!(matches!(
        forecast_accuracy(&[1.0, 2.0], &[1.0]),
        Err(ForecastError::ValidationError(_))
    ));
    assert!(forecast_accuracy(&[], &[]).is_err());
}

#[test]
fn test_estimates_round_ties_to_even() {
    let summary = summarize(&[0.125], 0.0).unwrap();
    assert_eq!(summary.pred_7d, 0.12);
    assert_eq!(summary.pred_30d, 0.12);

    let values = vec![101.625; 30];
    let summary = summarize(&values, 100.0).unwrap();
    assert_eq!(summary.pred_7d, 101.62);
    assert_eq!(summary.pred_30d, 101.62);
}

#[test]
fn test_mape_skips_zero_actuals() {
    let accuracy = forecast_accuracy(&[5.0, 110.0], &[0.0, 100.0]).unwrap();
    assert_approx_eq!(accuracy.mape, 10.0);
    assert_approx_eq!(accuracy.mae, 7.5);

    let all_zero = forecast_accuracy(&[1.0, 2.0], &[0.0, 0.0]).unwrap();
    assert_eq!(all_zero.mape, 0.0);
}
