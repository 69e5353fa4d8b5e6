use pretty_assertions::assert_eq;
use price_forecast::data::Observation;
use price_forecast::series::aggregate;

fn obs(date: &str, material: &str, price: f64) -> Observation {
    Observation::new(date, material, price)
}

#[test]
fn test_duplicate_dates_are_averaged() {
    let observations = vec![
        obs("03/01/2026", "cement", 240.0),
        obs("03/01/2026", "cement", 250.0),
        obs("03/01/2026", "cement", 245.5),
        obs("01/01/2026", "cement", 100.2),
        obs("01/01/2026", "cement", 100.0),
        obs("02/01/2026", "steel", 186.0),
    ];

    let series = aggregate(&observations, "cement", None);

    assert_eq!(series.dates(), vec!["2026-01-01", "2026-01-03"]);
    assert_eq!(series.prices(), vec![100.1, 245.17]);
}

#[test]
fn test_output_strictly_ascending() {
    let observations = vec![
        obs("15/03/2026", "sand", 85.0),
        obs("01/01/2026", "sand", 84.0),
        obs("2026-02-10", "sand", 86.0),
        obs("15/03/2026", "sand", 87.0),
        obs("31/12/2025", "sand", 83.0),
        obs("10/02/2026", "sand", 88.0),
    ];

    let series = aggregate(&observations, "sand", None);
    let points = series.points();

    assert_eq!(points.len(), 4);
    assert!(points.windows(2).all(|w| w[0].date < w[1].date));
    // "2026-02-10" and "10/02/2026" are the same day
    assert_eq!(points[2].price, 87.0);
}

#[test]
fn test_unknown_material_is_empty_not_error() {
    let observations = vec![obs("01/01/2026", "cement", 240.0)];

    assert!(aggregate(&observations, "marble", None).is_empty());
    assert!(aggregate(&[], "cement", Some(30)).is_empty());
}

#[test]
fn test_material_match_is_exact() {
    let observations = vec![
        obs("01/01/2026", "cement", 240.0),
        obs("01/01/2026", "Cement", 999.0),
        obs("01/01/2026", "cement ", 999.0),
    ];

    assert_eq!(aggregate(&observations, "cement", None).prices(), vec![240.0]);
}

#[test]
fn test_unparseable_dates_are_dropped() {
    let observations = vec![
        obs("01/01/2026", "steel", 186.0),
        obs("not-a-date", "steel", 1000.0),
        obs("32/01/2026", "steel", 1000.0),
        obs("", "steel", 1000.0),
        obs("+1/+2/2026", "steel", 1000.0),
    ];

    let series = aggregate(&observations, "steel", None);
    assert_eq!(series.prices(), vec![186.0]);
}

#[test]
fn test_max_days_returns_trailing_dates() {
    let observations: Vec<Observation> = (1..=10)
        .map(|d| obs(&format!("{:02}/01/2026", d), "gravel", 70.0 + d as f64))
        .collect();

    let series = aggregate(&observations, "gravel", Some(3));
    assert_eq!(series.dates(), vec!["2026-01-08", "2026-01-09", "2026-01-10"]);
    assert_eq!(series.prices(), vec![78.0, 79.0, 80.0]);

    let all = aggregate(&observations, "gravel", Some(100));
    assert_eq!(all.len(), 10);
}

#[test]
fn test_prices_rounded_to_cents() {
    let observations = vec![
        obs("01/01/2026", "lumber", 98.0),
        obs("01/01/2026", "lumber", 98.0),
        obs("01/01/2026", "lumber", 99.0),
    ];

    assert_eq!(aggregate(&observations, "lumber", None).prices(), vec![98.33]);
}

#[test]
fn test_quarter_price_ties_round_to_even() {
    let observations = vec![
        obs("01/01/2026", "plywood", 101.25),
        obs("01/01/2026", "plywood", 101.0),
        obs("02/01/2026", "plywood", 101.5),
        obs("02/01/2026", "plywood", 101.25),
    ];

    // means are 101.125 and 101.375
    assert_eq!(
        aggregate(&observations, "plywood", None).prices(),
        vec![101.12, 101.38]
    );
}
