use pretty_assertions::assert_eq;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_cli(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_davao-forecast"))
        .current_dir(dir.path())
        .env("DAVAO_DATASET", dir.path().join("missing.csv"))
        .env_remove("DAVAO_HORIZON")
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_materials_stdout_is_pure_json() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(&dir, &["materials"]);

    assert!(output.status.success());
    let listing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listing.as_array().unwrap().len(), 6);
    assert_eq!(listing[0]["name"], "plywood");
}

#[test]
fn test_predict_falls_back_to_demo_without_dataset() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(&dir, &["predict", "cement"]);

    assert!(output.status.success());
    let card: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(card["source"], "demo");
    assert_eq!(card["current_price"], 244.5);
}

#[test]
fn test_unknown_material_fails() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(&dir, &["predict", "marble"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
