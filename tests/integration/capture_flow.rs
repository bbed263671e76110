//! Integration tests for the capture flow
//!
//! Requests go through the capturing proxy to a fake Hevy API; the workout
//! response is relayed into the slot and exported through the control routes.

use super::common::{wait_until, workout_json, CaptureHarness, WORKOUT_ID};
use hevy_tcx::visibility::ControlState;
use serde_json::{json, Value};

/// The proxied response reaches the client unchanged and the workout is captured
#[tokio::test]
async fn test_proxied_workout_is_captured() {
    let dir = tempfile::tempdir().unwrap();
    let harness = CaptureHarness::start(dir.path()).await;
    let client = reqwest::Client::new();

    let response = client
        .get(harness.url(&format!("/workout/{}", WORKOUT_ID)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, workout_json(WORKOUT_ID));

    let state = harness.state.clone();
    assert!(wait_until(|| !state.slot().is_empty()).await);
    assert_eq!(state.slot().short_id().as_deref(), Some(WORKOUT_ID));

    harness.shutdown().await;
}

/// Responses outside the workout prefix or without a workout shape are ignored
#[tokio::test]
async fn test_unrelated_responses_are_not_captured() {
    let dir = tempfile::tempdir().unwrap();
    let harness = CaptureHarness::start(dir.path()).await;
    let client = reqwest::Client::new();

    let account: Value = client
        .get(harness.url("/user/account"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(account, json!({"username": "lifter"}));

    let comments = client
        .get(harness.url(&format!("/workout/{}/comments", WORKOUT_ID)))
        .send()
        .await
        .unwrap();
    assert_eq!(comments.status(), 200);

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(harness.state.slot().is_empty());

    let status: Value = client
        .get(harness.url("/_tcx/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["captured"], false);

    harness.shutdown().await;
}

/// Export before anything was captured reports the no-data condition
#[tokio::test]
async fn test_export_before_capture() {
    let dir = tempfile::tempdir().unwrap();
    let harness = CaptureHarness::start(dir.path()).await;

    let response = reqwest::get(harness.url("/_tcx/export")).await.unwrap();
    assert_eq!(response.status(), 409);

    harness.shutdown().await;
}

/// Capture then download yields the TCX document for the captured workout
#[tokio::test]
async fn test_capture_then_download() {
    let dir = tempfile::tempdir().unwrap();
    let harness = CaptureHarness::start(dir.path()).await;
    let client = reqwest::Client::new();

    client
        .get(harness.url(&format!("/workout/{}", WORKOUT_ID)))
        .send()
        .await
        .unwrap();
    let state = harness.state.clone();
    assert!(wait_until(|| !state.slot().is_empty()).await);

    let response = client.get(harness.url("/_tcx/export")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"hevy-workout-AbC123.tcx\""
    );
    assert_eq!(response.headers()["x-heart-rate-samples"], "2");

    let xml = response.text().await.unwrap();
    assert!(xml.contains("<Id>2025-12-03T13:02:12.000Z</Id>"));
    assert!(xml.contains("<TotalTimeSeconds>600</TotalTimeSeconds>"));
    assert!(xml.contains("<Calories>180</Calories>"));

    let times: Vec<&str> = xml
        .match_indices("<Time>")
        .map(|(i, _)| &xml[i + 6..i + 30])
        .collect();
    assert_eq!(
        times,
        vec![
            "2025-12-03T13:02:12.000Z",
            "2025-12-03T13:02:20.000Z",
            "2025-12-03T13:03:20.000Z",
            "2025-12-03T13:12:12.000Z",
        ]
    );
    assert!(xml.contains("<Value>102</Value>"));

    harness.shutdown().await;
}

/// Saving writes the export into the configured output directory
#[tokio::test]
async fn test_capture_then_save() {
    let dir = tempfile::tempdir().unwrap();
    let harness = CaptureHarness::start(dir.path()).await;
    let client = reqwest::Client::new();

    client
        .get(harness.url(&format!("/workout/{}", WORKOUT_ID)))
        .send()
        .await
        .unwrap();
    let state = harness.state.clone();
    assert!(wait_until(|| !state.slot().is_empty()).await);

    let report: Value = client
        .post(harness.url("/_tcx/export"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(report["filename"], "hevy-workout-AbC123.tcx");

    let saved = std::fs::read_to_string(dir.path().join("hevy-workout-AbC123.tcx")).unwrap();
    assert!(saved.ends_with("</TrainingCenterDatabase>\n"));

    harness.shutdown().await;
}

/// The export control follows the page location once a workout is held
#[tokio::test]
async fn test_control_visibility_follows_location() {
    let dir = tempfile::tempdir().unwrap();
    let harness = CaptureHarness::start(dir.path()).await;
    let client = reqwest::Client::new();
    let state = harness.state.clone();

    client
        .post(harness.url("/_tcx/location"))
        .json(&json!({"location": "https://hevy.com/workout/AbC123"}))
        .send()
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(state.control().lock().state(), ControlState::Absent);

    client
        .get(harness.url(&format!("/workout/{}", WORKOUT_ID)))
        .send()
        .await
        .unwrap();
    assert!(wait_until(|| state.control().lock().state() == ControlState::Visible).await);

    client
        .post(harness.url("/_tcx/location"))
        .json(&json!({"location": "https://hevy.com/routines"}))
        .send()
        .await
        .unwrap();
    assert!(wait_until(|| state.control().lock().state() == ControlState::Hidden).await);

    let status: Value = client
        .get(harness.url("/_tcx/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["control"], "hidden");
    assert_eq!(status["location"], "https://hevy.com/routines");

    harness.shutdown().await;
}
