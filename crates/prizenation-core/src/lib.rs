#![forbid(unsafe_code)]

mod domain;
mod errors;

pub use domain::config::{
    resolve_config_dir, resolve_config_path, resolve_session_path, ClientConfig, ConfigError,
    ConfigLayer, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS,
};
pub use errors::{ConfigPathScope, ExitCode, MachineError};

pub const CRATE_NAME: &str = "prizenation-core";

pub const ENV_API_URL: &str = "PRIZENATION_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "PRIZENATION_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "PRIZENATION_LOG_LEVEL";
pub const ENV_LOG_JSON: &str = "PRIZENATION_LOG_JSON";
pub const ENV_CONFIG_DIR: &str = "PRIZENATION_CONFIG_DIR";

/// Parses the boolean spellings accepted in environment overrides.
#[must_use]
pub fn parse_env_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}
