use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::capture::DEFAULT_TARGET_PREFIX;
use crate::tcx::TcxOptions;
use crate::util::paths::{config_path, default_export_dir};
use crate::visibility::{DEFAULT_POLL_INTERVAL, DEFAULT_WORKOUT_PATH_MARKER};
use crate::web::ServerConfig;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Default upstream for the capturing proxy
pub const DEFAULT_UPSTREAM: &str = "https://api.hevyapp.com";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Network capture settings
    pub capture: CaptureConfig,
    /// Labels written into TCX documents
    pub tcx: TcxOptions,
    /// Web server bind address
    pub server: ServerConfig,
    /// Export destination
    pub export: ExportConfig,
    /// Export control visibility
    pub visibility: VisibilityConfig,
}

#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub target_prefix: String,
    pub upstream: String,
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct VisibilityConfig {
    pub workout_path_marker: String,
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capture: CaptureConfig {
                target_prefix: DEFAULT_TARGET_PREFIX.to_string(),
                upstream: DEFAULT_UPSTREAM.to_string(),
            },
            tcx: TcxOptions::default(),
            server: ServerConfig::default(),
            export: ExportConfig {
                output_dir: default_export_dir(),
            },
            visibility: VisibilityConfig {
                workout_path_marker: DEFAULT_WORKOUT_PATH_MARKER.to_string(),
                poll_interval: DEFAULT_POLL_INTERVAL,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlCaptureConfig {
    pub target_prefix: Option<String>,
    pub upstream: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlTcxConfig {
    pub sport: Option<String>,
    pub creator: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlExportConfig {
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlVisibilityConfig {
    pub workout_path_marker: Option<String>,
    pub poll_interval_ms: Option<u64>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub capture: Option<TomlCaptureConfig>,
    pub tcx: Option<TomlTcxConfig>,
    pub server: Option<TomlServerConfig>,
    pub export: Option<TomlExportConfig>,
    pub visibility: Option<TomlVisibilityConfig>,
}

impl Config {
    /// Load configuration from the default config file, merging with defaults
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Load configuration from `config_file`, merging with defaults.
    ///
    /// A missing file is created from the bundled example. A malformed file
    /// is reported and the defaults are used.
    pub fn load_from(config_file: &Path) -> Self {
        let mut config = Config::default();

        // Create example config on first run
        if !config_file.exists() {
            Self::create_default_config(config_file);
        }

        if let Ok(contents) = fs::read_to_string(config_file) {
            match toml::from_str::<TomlConfig>(&contents) {
                Ok(toml_config) => config.merge(toml_config),
                Err(e) => {
                    tracing::warn!(
                        path = %config_file.display(),
                        error = %e,
                        "Ignoring malformed config file"
                    );
                }
            }
        }

        config
    }

    /// Parse a config document on top of the defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        let mut config = Config::default();
        config.merge(toml::from_str(contents)?);
        Ok(config)
    }

    fn merge(&mut self, toml_config: TomlConfig) {
        if let Some(capture) = toml_config.capture {
            if let Some(target_prefix) = capture.target_prefix {
                self.capture.target_prefix = target_prefix;
            }
            if let Some(upstream) = capture.upstream {
                self.capture.upstream = upstream;
            }
        }

        if let Some(tcx) = toml_config.tcx {
            if let Some(sport) = tcx.sport {
                self.tcx.sport = sport;
            }
            if let Some(creator) = tcx.creator {
                self.tcx.creator = creator;
            }
            if let Some(author) = tcx.author {
                self.tcx.author = author;
            }
        }

        if let Some(server) = toml_config.server {
            if let Some(host) = server.host {
                self.server.host = host;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
        }

        if let Some(export) = toml_config.export {
            if let Some(output_dir) = export.output_dir {
                self.export.output_dir = output_dir;
            }
        }

        if let Some(visibility) = toml_config.visibility {
            if let Some(marker) = visibility.workout_path_marker {
                self.visibility.workout_path_marker = marker;
            }
            if let Some(ms) = visibility.poll_interval_ms {
                self.visibility.poll_interval = Duration::from_millis(ms.max(1));
            }
        }
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    eprintln!("Failed to create config directory: {}", e);
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            eprintln!("Failed to write default config: {}", e);
        }
    }

    pub fn with_upstream(mut self, upstream: impl Into<String>) -> Self {
        self.capture.upstream = upstream.into();
        self
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.export.output_dir = dir;
        self
    }
}
