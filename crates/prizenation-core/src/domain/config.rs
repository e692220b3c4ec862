// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigPathScope;

pub const DEFAULT_API_URL: &str = "http://localhost:8001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const APP_DIR: &str = "prizenation";
const WORKSPACE_DIR: &str = ".prizenation";

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[must_use]
pub fn resolve_config_dir() -> PathBuf {
    if let Some(explicit) = non_empty_env(crate::ENV_CONFIG_DIR) {
        return PathBuf::from(explicit);
    }
    if let Some(xdg_config_home) = non_empty_env("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg_config_home).join(APP_DIR);
    }
    if let Some(home) = non_empty_env("HOME") {
        return PathBuf::from(home).join(".config").join(APP_DIR);
    }
    PathBuf::from(WORKSPACE_DIR)
}

#[must_use]
pub fn resolve_config_path(scope: ConfigPathScope) -> PathBuf {
    match scope {
        ConfigPathScope::User => resolve_config_dir().join("config.toml"),
        ConfigPathScope::Workspace => PathBuf::from(WORKSPACE_DIR).join("config.toml"),
    }
}

/// Location of the persisted bearer token and cached user.
#[must_use]
pub fn resolve_session_path() -> PathBuf {
    resolve_config_dir().join("session.json")
}

#[derive(Debug)]
#[non_exhaustive]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, message: String },
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "failed to parse config {}: {message}", path.display())
            }
            Self::Invalid { key, value } => write!(f, "invalid value for {key}: `{value}`"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { .. } | Self::Invalid { .. } => None,
        }
    }
}

/// One source of configuration values. Unset fields fall through to the next layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub log_json: Option<bool>,
}

impl ConfigLayer {
    /// Reads a TOML layer; a missing file is an empty layer.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let timeout_secs = match get(crate::ENV_TIMEOUT_SECS) {
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| ConfigError::Invalid {
                key: crate::ENV_TIMEOUT_SECS,
                value: raw.clone(),
            })?),
            None => None,
        };
        let log_json = match get(crate::ENV_LOG_JSON) {
            Some(raw) => Some(crate::parse_env_bool(&raw).ok_or(ConfigError::Invalid {
                key: crate::ENV_LOG_JSON,
                value: raw.clone(),
            })?),
            None => None,
        };
        Ok(Self {
            api_url: get(crate::ENV_API_URL),
            timeout_secs,
            log_json,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if api_url.is_some() {
            self.api_url = api_url;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout_secs: u64,
    pub log_json: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_json: false,
        }
    }
}

impl ClientConfig {
    /// Merges layers ordered from highest to lowest precedence.
    #[must_use]
    pub fn from_layers(layers: &[ConfigLayer]) -> Self {
        let defaults = Self::default();
        let api_url = layers
            .iter()
            .find_map(|l| l.api_url.clone())
            .unwrap_or(defaults.api_url);
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            timeout_secs: layers
                .iter()
                .find_map(|l| l.timeout_secs)
                .unwrap_or(defaults.timeout_secs),
            log_json: layers
                .iter()
                .find_map(|l| l.log_json)
                .unwrap_or(defaults.log_json),
        }
    }

    /// Flags, then environment, then the workspace file, then the user file.
    pub fn load(flags: ConfigLayer) -> Result<Self, ConfigError> {
        let env = ConfigLayer::from_env()?;
        let workspace = ConfigLayer::load(&resolve_config_path(ConfigPathScope::Workspace))?;
        let user = ConfigLayer::load(&resolve_config_path(ConfigPathScope::User))?;
        Ok(Self::from_layers(&[flags, env, workspace, user]))
    }

    #[must_use]
    pub fn api_base(&self) -> String {
        format!("{}/api", self.api_url)
    }

    /// Backend-relative paths (`/uploads/..`, `/payment/..`) become absolute URLs.
    #[must_use]
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}
