//! Docsum Config - Configuration management for docsum.

mod config;
mod error;
mod paths;

pub use config::*;
pub use error::{ConfigError, ConfigResult};
pub use paths::{AppPaths, CONFIG_ENV_VAR};
