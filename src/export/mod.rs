//! Export of the captured workout as a TCX file

mod sink;

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::relay::CapturedPayload;
use crate::tcx::{TcxError, TcxSerializer};
use crate::workout::short_id_label;

pub use sink::{DirectorySink, DownloadSink};

pub const TCX_MIME_TYPE: &str = "application/vnd.garmin.tcx+xml";

/// Placeholder used in file names when the workout has no short id
pub const UNKNOWN_WORKOUT_ID: &str = "UNKNOWN-ID";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(
        "No workout data captured yet. Refresh the workout page so the request can be intercepted."
    )]
    NoData,

    #[error("Error converting data: {0}")]
    Serialize(#[from] TcxError),

    #[error("Failed to deliver {filename}: {source}")]
    Delivery {
        filename: String,
        #[source]
        source: io::Error,
    },
}

/// A serialized workout ready for download
#[derive(Debug, Clone)]
pub struct TcxArtifact {
    pub filename: String,
    pub mime_type: &'static str,
    pub content: String,
    pub sample_count: usize,
    pub workout_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub filename: String,
    pub path: PathBuf,
    pub sample_count: usize,
}

/// File name for an exported workout: `hevy-workout-<short_id>.tcx`.
///
/// Characters other than ASCII alphanumerics, `-` and `_` are replaced so the
/// id cannot introduce path separators.
pub fn export_filename(short_id: Option<&str>) -> String {
    let id = match short_id.filter(|id| !id.is_empty()) {
        Some(id) => id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect(),
        None => UNKNOWN_WORKOUT_ID.to_string(),
    };
    format!("hevy-workout-{}.tcx", id)
}

/// Turns the captured payload into a TCX artifact on request.
#[derive(Debug, Clone, Default)]
pub struct ExportTrigger {
    serializer: TcxSerializer,
}

impl ExportTrigger {
    pub fn new(serializer: TcxSerializer) -> Self {
        Self { serializer }
    }

    /// Serialize the held payload without delivering it.
    pub fn prepare(&self, slot: &CapturedPayload) -> Result<TcxArtifact, ExportError> {
        let payload = slot.get().ok_or(ExportError::NoData)?;
        let export = self.serializer.serialize_value(&payload)?;
        for warning in &export.warnings {
            tracing::warn!(%warning, "TCX export warning");
        }

        let short_id = payload.get("short_id").and_then(short_id_label);
        Ok(TcxArtifact {
            filename: export_filename(short_id.as_deref()),
            mime_type: TCX_MIME_TYPE,
            content: export.xml,
            sample_count: export.sample_count,
            workout_date: export.start_time,
        })
    }

    /// Serialize the held payload and hand it to `sink`.
    ///
    /// Nothing reaches the sink when serialization fails.
    pub async fn export(
        &self,
        slot: &CapturedPayload,
        sink: &dyn DownloadSink,
    ) -> Result<ExportReport, ExportError> {
        let artifact = self.prepare(slot)?;
        let path = sink
            .deliver(&artifact)
            .await
            .map_err(|source| ExportError::Delivery {
                filename: artifact.filename.clone(),
                source,
            })?;

        tracing::info!(
            path = %path.display(),
            samples = artifact.sample_count,
            workout_date = %artifact.workout_date,
            "Exported workout"
        );
        Ok(ExportReport {
            filename: artifact.filename,
            path,
            sample_count: artifact.sample_count,
        })
    }
}
