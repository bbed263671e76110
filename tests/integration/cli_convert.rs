//! Integration tests for the `convert` subcommand

use super::common::{workout_json, WORKOUT_ID};
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn hevy_tcx(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hevy-tcx").expect("binary should build");
    cmd.arg("--data-dir").arg(data_dir.path());
    cmd
}

#[test]
fn test_convert_writes_tcx() {
    let data_dir = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let input = work.path().join("input.json");
    let output = work.path().join("output.tcx");
    fs::write(&input, workout_json(WORKOUT_ID).to_string()).unwrap();

    hevy_tcx(&data_dir)
        .arg("convert")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Success! Created"))
        .stdout(predicate::str::contains("Converted 2 heart rate samples."))
        .stdout(predicate::str::contains(
            "Workout Date: 2025-12-03T13:02:12.000Z",
        ));

    let xml = fs::read_to_string(&output).unwrap();
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains(r#"<Activity Sport="Other">"#));

    // First run drops the example config into the data dir
    assert!(data_dir.path().join("config.toml").exists());
}

#[test]
fn test_convert_sport_override() {
    let data_dir = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let input = work.path().join("input.json");
    let output = work.path().join("output.tcx");
    fs::write(&input, workout_json(WORKOUT_ID).to_string()).unwrap();

    hevy_tcx(&data_dir)
        .args(["convert", "--sport", "StrengthTraining"])
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let xml = fs::read_to_string(&output).unwrap();
    assert!(xml.contains(r#"<Activity Sport="StrengthTraining">"#));
}

#[test]
fn test_convert_uses_config_labels() {
    let data_dir = TempDir::new().unwrap();
    fs::write(
        data_dir.path().join("config.toml"),
        "[tcx]\ncreator = \"Hevy Pro\"\n",
    )
    .unwrap();
    let work = TempDir::new().unwrap();
    let input = work.path().join("input.json");
    let output = work.path().join("output.tcx");
    fs::write(&input, workout_json(WORKOUT_ID).to_string()).unwrap();

    hevy_tcx(&data_dir)
        .arg("convert")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let xml = fs::read_to_string(&output).unwrap();
    assert!(xml.contains("<Name>Hevy Pro</Name>"));
}

#[test]
fn test_convert_warns_without_samples() {
    let data_dir = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let input = work.path().join("input.json");
    let output = work.path().join("output.tcx");
    fs::write(
        &input,
        r#"{"short_id": "x", "start_time": 1000, "end_time": 1600, "biometrics": {}}"#,
    )
    .unwrap();

    hevy_tcx(&data_dir)
        .arg("convert")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted 0 heart rate samples."))
        .stderr(predicate::str::contains("Warning"));

    assert!(output.exists());
}

#[test]
fn test_convert_missing_input_fails() {
    let data_dir = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let output = work.path().join("output.tcx");

    hevy_tcx(&data_dir)
        .arg("convert")
        .arg("--input")
        .arg(work.path().join("missing.json"))
        .arg("--output")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.json"));

    assert!(!output.exists());
}

#[test]
fn test_convert_invalid_json_fails() {
    let data_dir = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let input = work.path().join("input.json");
    let output = work.path().join("output.tcx");
    fs::write(&input, "{ not json").unwrap();

    hevy_tcx(&data_dir)
        .arg("convert")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not parse"));

    assert!(!output.exists());
}
