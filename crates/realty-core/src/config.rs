use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Root configuration structure for config.toml
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RealtyConfig {
    /// Base URL of the analysis service; `/analyze/` is appended to it.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl RealtyConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn analyze_url(&self) -> String {
        self.service_url("analyze/")
    }

    pub fn upload_url(&self) -> String {
        self.service_url("upload/")
    }

    fn service_url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), path)
    }
}

impl Default for RealtyConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: default_timeout_secs(),
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: RealtyConfig = toml::from_str("endpoint = \"http://example.test/api/\"").unwrap();
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.analyze_url(), "http://example.test/api/analyze/");
    }

    #[test]
    fn test_default_urls() {
        let config = RealtyConfig::default();
        assert_eq!(config.analyze_url(), "http://127.0.0.1:8000/api/analyze/");
        assert_eq!(config.upload_url(), "http://127.0.0.1:8000/api/upload/");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }
}
