//! Utility modules

pub mod files;
pub mod paths;

pub use files::write_atomically;
pub use paths::{
    config_path, data_dir, default_export_dir, executable_dir, init_data_dir, log_file_path,
    logs_dir,
};
