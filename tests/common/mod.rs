//! Shared test utilities for hevy-tcx
//!
//! - Workout payload fixtures
//! - A fake Hevy API upstream
//! - A running capture server bound to an ephemeral port

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use axum::extract::Path as UrlPath;
use axum::routing::get;
use axum::{Json, Router};
use hevy_tcx::{build_router, Config, WebAppState};
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub const WORKOUT_ID: &str = "AbC123";

/// A complete workout record as served by the workout API.
///
/// Samples are deliberately out of order.
pub fn workout_json(short_id: &str) -> Value {
    json!({
        "id": "1b5a8c0e-0000-4000-8000-000000000000",
        "short_id": short_id,
        "name": "Push Day",
        "start_time": 1_764_766_932,
        "end_time": 1_764_767_532,
        "biometrics": {
            "total_calories": 180,
            "heart_rate_samples": [
                {"timestamp_ms": 1_764_767_000_000_i64, "bpm": 101.6},
                {"timestamp_ms": 1_764_766_940_000_i64, "bpm": 88},
                {"timestamp_ms": 1_764_767_300_000_i64, "bpm": 0}
            ]
        },
        "exercises": [{"title": "Bench Press", "sets": [{"reps": 8, "weight_kg": 80}]}]
    })
}

/// Fake upstream: workouts under `/workout/{id}`, plus an unrelated route.
pub fn fake_hevy_api() -> Router {
    Router::new()
        .route(
            "/workout/{id}",
            get(|UrlPath(id): UrlPath<String>| async move { Json(workout_json(&id)) }),
        )
        .route(
            "/workout/{id}/comments",
            get(|| async { Json(json!({"comments": []})) }),
        )
        .route(
            "/user/account",
            get(|| async { Json(json!({"username": "lifter"})) }),
        )
}

/// Serve `app` on 127.0.0.1 with an ephemeral port.
pub async fn spawn_app(app: Router) -> (SocketAddr, JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });
    (addr, handle)
}

/// A capture server in front of a fake upstream.
pub struct CaptureHarness {
    pub state: WebAppState,
    pub addr: SocketAddr,
    pub cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
    servers: Vec<JoinHandle<()>>,
}

impl CaptureHarness {
    pub async fn start(output_dir: &Path) -> Self {
        let (upstream_addr, upstream) = spawn_app(fake_hevy_api()).await;
        let upstream_url = format!("http://{}", upstream_addr);

        let mut config = Config::default()
            .with_upstream(upstream_url.clone())
            .with_output_dir(output_dir.to_path_buf());
        config.capture.target_prefix = format!("{}/workout/", upstream_url);
        config.visibility.poll_interval = Duration::from_millis(10);

        let state = WebAppState::new(config);
        let cancel = CancellationToken::new();
        let tasks = state.start_background(&cancel);
        let (addr, server) = spawn_app(build_router(state.clone(), true)).await;

        Self {
            state,
            addr,
            cancel,
            tasks,
            servers: vec![upstream, server],
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn shutdown(self) {
        self.cancel.cancel();
        for task in self.tasks {
            task.await.expect("Background task panicked");
        }
        for server in self.servers {
            server.abort();
        }
    }
}

/// Poll `check` until it holds or a second has passed.
pub async fn wait_until(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
