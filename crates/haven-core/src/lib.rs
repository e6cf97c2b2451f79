//! Haven Core - Shared functionality for Haven wellness tools

pub mod config;
pub mod format;
pub mod paths;

pub use config::{Config, ConfigError};
pub use paths::Paths;
