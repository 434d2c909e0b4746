pub mod config_service;
pub mod paths;

pub use config_service::{ConfigService, anchor_log_file, apply_env_overrides};
pub use paths::RealtyPaths;
