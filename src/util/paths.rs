//! Path utilities for hevy-tcx data directories

use std::path::PathBuf;
use std::sync::OnceLock;

/// Global storage for custom data directory path
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Initialize the data directory with an optional custom path.
/// Must be called early in main() before any other path functions are used.
/// If custom_path is None, uses the default ~/.hevy-tcx location.
pub fn init_data_dir(custom_path: Option<PathBuf>) {
    let path = custom_path.unwrap_or_else(default_data_dir);
    // Ignore error if already set (shouldn't happen in normal usage)
    if DATA_DIR.set(path.clone()).is_err() {
        let existing = DATA_DIR
            .get()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        tracing::debug!(
            path = %path.display(),
            existing = %existing,
            "Data directory already initialized"
        );
    }
}

/// Get the default data directory path (~/.hevy-tcx)
fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".hevy-tcx"))
        .unwrap_or_else(|| PathBuf::from(".hevy-tcx"))
}

/// Get the base data directory.
/// Returns the custom path if set via init_data_dir(), otherwise ~/.hevy-tcx
pub fn data_dir() -> PathBuf {
    DATA_DIR.get().cloned().unwrap_or_else(default_data_dir)
}

/// Get the logs directory (~/.hevy-tcx/logs)
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Get the default log file path (~/.hevy-tcx/logs/hevy-tcx.log)
pub fn log_file_path() -> PathBuf {
    logs_dir().join("hevy-tcx.log")
}

/// Get the config file path (~/.hevy-tcx/config.toml)
pub fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}

/// Where exported TCX files land when no directory is configured.
///
/// Prefers the user's download directory, falling back to
/// ~/.hevy-tcx/exports.
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| data_dir().join("exports"))
}

/// Directory holding the running executable, used to resolve the default
/// `input.json` / `output.tcx` pair of the file converter.
pub fn executable_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}
