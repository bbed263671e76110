//! Control route definitions.

use axum::{
    routing::{get, post},
    Router,
};

use crate::web::handlers::{export, status};
use crate::web::state::WebAppState;

/// Routes served by the capture server itself, nested under `/_tcx`.
pub fn control_routes() -> Router<WebAppState> {
    Router::new()
        .route("/health", get(status::health))
        .route("/status", get(status::get_status))
        .route("/location", post(status::update_location))
        .route("/export", get(export::download_export))
        .route("/export", post(export::save_export))
}
