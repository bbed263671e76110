//! File-based conversion: a saved workout JSON document in, a TCX file out

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::tcx::{TcxError, TcxSerializer, TcxWarning};
use crate::util::write_atomically;
use crate::workout::WorkoutRecord;

pub const DEFAULT_INPUT_FILENAME: &str = "input.json";
pub const DEFAULT_OUTPUT_FILENAME: &str = "output.tcx";

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Serialize(#[from] TcxError),

    #[error("Error writing {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct ConvertReport {
    pub output: PathBuf,
    pub sample_count: usize,
    /// Workout start as an ISO timestamp
    pub workout_date: String,
    pub warnings: Vec<TcxWarning>,
}

/// Convert the workout stored at `input` into a TCX file at `output`.
///
/// Nothing is written unless the whole document was produced.
pub fn convert_file(
    input: &Path,
    output: &Path,
    serializer: &TcxSerializer,
) -> Result<ConvertReport, ConvertError> {
    let contents = fs::read_to_string(input).map_err(|source| ConvertError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let value: serde_json::Value =
        serde_json::from_str(&contents).map_err(|source| ConvertError::Parse {
            path: input.to_path_buf(),
            source,
        })?;
    let record = WorkoutRecord::from_value(&value).map_err(TcxError::from)?;

    let export = serializer.serialize(&record)?;
    for warning in &export.warnings {
        tracing::warn!(%warning, input = %input.display(), "TCX conversion warning");
    }

    write_atomically(output, export.xml.as_bytes()).map_err(|source| ConvertError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        samples = export.sample_count,
        "Converted workout"
    );
    Ok(ConvertReport {
        output: output.to_path_buf(),
        sample_count: export.sample_count,
        workout_date: export.start_time,
        warnings: export.warnings,
    })
}
