pub mod config;
pub mod error;
pub mod paths;

pub use config::{Config, LoggingConfig};
pub use error::ConfigError;
pub use paths::{config_file_path, PathManager, ResolvedPaths};
