mod settings;

pub use settings::{
    CaptureConfig, Config, ExportConfig, TomlConfig, VisibilityConfig, DEFAULT_UPSTREAM,
    EXAMPLE_CONFIG,
};
