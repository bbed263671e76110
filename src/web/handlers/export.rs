//! Export handlers: browser download and save-to-directory.

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};

use crate::export::{DirectorySink, ExportReport};
use crate::web::error::WebError;
use crate::web::state::WebAppState;

/// Header carrying the number of exported heart rate samples
pub const SAMPLE_COUNT_HEADER: HeaderName = HeaderName::from_static("x-heart-rate-samples");

/// Serve the captured workout as a TCX attachment.
pub async fn download_export(State(state): State<WebAppState>) -> Result<Response, WebError> {
    let artifact = state.exporter().prepare(state.slot())?;

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        artifact.filename
    ))
    .map_err(|e| WebError::Internal(e.to_string()))?;

    tracing::info!(
        filename = %artifact.filename,
        samples = artifact.sample_count,
        "Serving workout download"
    );

    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static(artifact.mime_type)),
        (header::CONTENT_DISPOSITION, disposition),
        (SAMPLE_COUNT_HEADER, HeaderValue::from(artifact.sample_count)),
    ];
    Ok((headers, artifact.content).into_response())
}

/// Write the captured workout into the configured output directory.
pub async fn save_export(
    State(state): State<WebAppState>,
) -> Result<Json<ExportReport>, WebError> {
    let sink = DirectorySink::new(state.config().export.output_dir.clone());
    let report = state.exporter().export(state.slot(), &sink).await?;
    Ok(Json(report))
}
