//! Unified path management for realty configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/realty/            # Config directory
//! ├── config.toml              # Application configuration
//! ├── history.txt              # REPL input history
//! └── logs/                    # Application logs (when file logging is on)
//!     └── realty.log
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

const APP_DIR: &str = "realty";

/// Unified path management for realty.
pub struct RealtyPaths;

impl RealtyPaths {
    /// Returns the realty configuration directory (e.g. `~/.config/realty/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the REPL history file.
    pub fn history_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("history.txt"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file() {
        let Ok(config_dir) = RealtyPaths::config_dir() else {
            return;
        };
        assert!(config_dir.ends_with("realty"));

        let config_file = RealtyPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        assert!(config_file.starts_with(&config_dir));
    }

    #[test]
    fn test_history_and_logs_live_under_config_dir() {
        let Ok(config_dir) = RealtyPaths::config_dir() else {
            return;
        };
        assert!(RealtyPaths::history_file().unwrap().starts_with(&config_dir));
        assert!(RealtyPaths::logs_dir().unwrap().ends_with("logs"));
    }
}
