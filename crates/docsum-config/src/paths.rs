//! Application paths management.

use directories::ProjectDirs;
use std::path::PathBuf;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "DOCSUM_CONFIG";

/// Platform-conventional locations used by docsum.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
}

impl AppPaths {
    /// Create paths using platform-specific directories.
    pub fn new() -> Option<Self> {
        let proj_dirs = ProjectDirs::from("com", "docsum", "docsum")?;
        let config_dir = proj_dirs.config_dir().to_path_buf();

        Some(Self {
            config_file: config_dir.join("config.toml"),
            config_dir,
        })
    }

    /// The config file to load: `$DOCSUM_CONFIG` if set, otherwise the platform default.
    pub fn resolve_config_file() -> Option<PathBuf> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
            _ => Self::new().map(|p| p.config_file),
        }
    }
}
