//! Integration test: binary exit status on missing inputs

mod common;

use common::scratch_dir;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_construction-cost"))
        .args(args)
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn assert_missing_input(output: &Output, what: &str) {
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout).to_lowercase();
    assert!(stdout.contains(&format!("{} not found", what)), "stdout was: {}", stdout);
}

#[test]
fn test_train_without_csv_exits_with_error() {
    let dir = scratch_dir("cli-train-missing");
    let data = dir.join("missing.csv");
    let output_path = dir.join("construction_model.json");

    let output = run(&[
        "train",
        "--data",
        data.to_str().unwrap(),
        "--output",
        output_path.to_str().unwrap(),
    ]);

    assert_missing_input(&output, "dataset");
    assert!(!output_path.exists());
}

#[test]
fn test_predict_without_artifact_exits_with_error() {
    let dir = scratch_dir("cli-predict-missing");
    let model = dir.join("construction_model.json");

    let output = run(&["predict", "--model", model.to_str().unwrap()]);

    assert_missing_input(&output, "model artifact");
    assert!(!model.exists());
}

#[test]
fn test_inspect_without_artifact_exits_with_error() {
    let dir = scratch_dir("cli-inspect-missing");
    let model = dir.join("construction_model.json");

    let output = run(&["inspect", "--model", model.to_str().unwrap()]);

    assert_missing_input(&output, "model artifact");
}
