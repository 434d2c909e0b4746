//! Loading of `config.toml` plus environment overrides.

use std::fs;
use std::path::{Path, PathBuf};

use realty_core::config::RealtyConfig;
use realty_core::{RealtyError, Result};
use tracing::debug;

use crate::paths::RealtyPaths;

pub const ENDPOINT_ENV: &str = "REALTY_ENDPOINT";
pub const TIMEOUT_ENV: &str = "REALTY_TIMEOUT_SECS";

/// Reads the client configuration from a TOML file.
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Uses `~/.config/realty/config.toml`.
    pub fn default_location() -> Result<Self> {
        let path = RealtyPaths::config_file().map_err(|e| RealtyError::config(e.to_string()))?;
        Ok(Self::new(path))
    }

    /// Loads the configuration.
    ///
    /// A missing or empty file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<RealtyConfig> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(RealtyConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(RealtyConfig::default());
        }

        let config: RealtyConfig = toml::from_str(&content)?;
        debug!(path = %self.path.display(), endpoint = %config.endpoint, "loaded config file");
        Ok(config)
    }

    /// Loads the configuration and applies `REALTY_*` environment overrides.
    pub fn load_with_env(&self) -> Result<RealtyConfig> {
        let mut config = self.load()?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        if let Ok(logs_dir) = RealtyPaths::logs_dir() {
            anchor_log_file(&mut config, &logs_dir);
        }
        Ok(config)
    }
}

/// Resolves a relative `log_file` against `logs_dir`.
pub fn anchor_log_file(config: &mut RealtyConfig, logs_dir: &Path) {
    if let Some(file) = config.log_file.as_mut().filter(|file| file.is_relative()) {
        *file = logs_dir.join(&*file);
    }
}

/// Overrides config values from `lookup` (normally the process environment).
///
/// # Errors
///
/// Returns a `Config` error when the timeout override is not a whole number of
/// seconds.
pub fn apply_env_overrides(
    config: &mut RealtyConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|v| !v.trim().is_empty()) {
        config.endpoint = endpoint.trim().to_string();
    }

    if let Some(raw) = lookup(TIMEOUT_ENV) {
        config.request_timeout_secs = raw.trim().parse().map_err(|_| {
            RealtyError::config(format!("{TIMEOUT_ENV} must be a number of seconds, got '{raw}'"))
        })?;
    }

    Ok(())
}
