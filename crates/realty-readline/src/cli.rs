use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use realty_core::config::RealtyConfig;
use realty_infrastructure::ConfigService;

/// Ask the locality analysis service about real estate trends.
///
/// Without a QUERY an interactive prompt is started.
#[derive(Parser, Debug)]
#[command(name = "realty", version)]
pub struct Cli {
    /// Run a single query (e.g. `Analyze Wakad`) and exit.
    pub query: Vec<String>,

    /// Base URL of the analysis service.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Path to config.toml (defaults to ~/.config/realty/config.toml).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level or filter directive (e.g. `debug`, `realty_interaction=trace`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the normalized result as JSON instead of rendering it (single query only).
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// The one-shot query, if any words were given.
    pub fn one_shot_query(&self) -> Option<String> {
        (!self.query.is_empty()).then(|| self.query.join(" "))
    }

    /// Config file, then `REALTY_*` environment, then command-line flags.
    pub fn resolve_config(&self) -> Result<RealtyConfig> {
        let service = match &self.config {
            Some(path) => ConfigService::new(path.clone()),
            None => ConfigService::default_location()?,
        };
        let mut config = service.load_with_env()?;
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut RealtyConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_words_are_joined() {
        let cli = Cli::try_parse_from(["realty", "Analyze", "Wakad"]).unwrap();
        assert_eq!(cli.one_shot_query().as_deref(), Some("Analyze Wakad"));
    }

    #[test]
    fn test_no_query_means_repl() {
        let cli = Cli::try_parse_from(["realty"]).unwrap();
        assert!(cli.one_shot_query().is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "realty",
            "--endpoint",
            "http://localhost:9000/api",
            "--timeout",
            "3",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let mut config = RealtyConfig::default();

        cli.apply_overrides(&mut config);

        assert_eq!(config.endpoint, "http://localhost:9000/api");
        assert_eq!(config.request_timeout_secs, 3);
        assert_eq!(config.log_level, "debug");
    }
}
