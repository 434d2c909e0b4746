//! Logging setup using `tracing-subscriber`.
//!
//! Logs go to stderr by default, or to `log_file` when configured so they do
//! not interleave with the prompt. A relative `log_file` is resolved under
//! `~/.config/realty/logs/` when the config is loaded. `REALTY_LOG` takes
//! precedence over the configured level and accepts full `EnvFilter`
//! directives.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use realty_core::config::{DEFAULT_LOG_LEVEL, RealtyConfig};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "REALTY_LOG";

/// Builds the filter from `REALTY_LOG`, falling back to `level`.
///
/// An unparsable `level` falls back to the default level.
pub fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Installs the global subscriber. Call once at startup.
pub fn init_logging(config: &RealtyConfig) -> Result<()> {
    let filter = build_env_filter(&config.log_level);

    match &config.log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .compact()
            .try_init(),
    }
    .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}
