//! Web error types for the capture server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::export::ExportError;

/// Error type for web API operations.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Bad request with validation error.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Nothing captured yet; the user should reload the workout page.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Captured payload could not be converted.
    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match &self {
            WebError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad Request", Some(msg.clone()))
            }
            WebError::Conflict(msg) => (StatusCode::CONFLICT, "No Data", Some(msg.clone())),
            WebError::Unprocessable(msg) => {
                tracing::warn!("Export failed: {}", msg);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Conversion Failed",
                    Some(msg.clone()),
                )
            }
            WebError::Internal(msg) => {
                tracing::error!("Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

impl From<ExportError> for WebError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::NoData => WebError::Conflict(err.to_string()),
            ExportError::Serialize(_) => WebError::Unprocessable(err.to_string()),
            ExportError::Delivery { .. } => WebError::Internal(err.to_string()),
        }
    }
}
