//! Health, capture status and page location handlers.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::visibility::ControlState;
use crate::web::error::WebError;
use crate::web::state::WebAppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint handler.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Current capture state.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub captured: bool,
    pub short_id: Option<String>,
    pub location: String,
    pub control: ControlState,
}

pub async fn get_status(State(state): State<WebAppState>) -> Json<StatusResponse> {
    let slot = state.slot();
    Json(StatusResponse {
        captured: !slot.is_empty(),
        short_id: slot.short_id(),
        location: state.location().get(),
        control: state.control().lock().state(),
    })
}

#[derive(Debug, Deserialize)]
pub struct UpdateLocationRequest {
    pub location: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateLocationResponse {
    pub location: String,
}

/// Record the page location reported by the browser.
pub async fn update_location(
    State(state): State<WebAppState>,
    Json(req): Json<UpdateLocationRequest>,
) -> Result<Json<UpdateLocationResponse>, WebError> {
    let location = req.location.trim();
    if location.is_empty() {
        return Err(WebError::BadRequest("location cannot be empty".to_string()));
    }

    tracing::debug!(location, "Page location updated");
    state.location().set(location);
    Ok(Json(UpdateLocationResponse {
        location: location.to_string(),
    }))
}
