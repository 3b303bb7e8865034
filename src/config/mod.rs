//! Configuration module
//!
//! Handles loading and managing configuration.

mod env;

pub use env::{env_help, EnvConfig};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::http::DEFAULT_TIMEOUT_SECS;
use crate::models::{CredentialSet, Locations};
use crate::results::CRITICAL_TESTS;

/// Marketplace API the checks run against
pub const DEFAULT_BASE_URL: &str = "https://localcrop-3.preview.emergentagent.com/api";

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./market-api-check.yaml",
    "./market-api-check.yml",
    "./market-api-check.json",
    "~/.config/market-api-check/config.yaml",
];

/// Invalid values in a resolved configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Base URL must start with http:// or https://: {0}")]
    InvalidBaseUrl(String),

    #[error("Timeout must be at least one second")]
    ZeroTimeout,
}

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// API base URL, without trailing slash
    pub base_url: String,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,

    /// Delete created products after the run
    pub cleanup: bool,

    /// Seeded accounts used by the login checks
    pub credentials: CredentialSet,

    /// GPS fixtures
    pub locations: Locations,

    /// Names reported in the critical checklist
    pub critical_tests: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            cleanup: true,
            credentials: CredentialSet::default(),
            locations: Locations::default(),
            critical_tests: CRITICAL_TESTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read config file")?;

        let config: Self = if is_yaml(path.as_ref()) {
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?
        } else {
            serde_json::from_str(&content).context("Failed to parse JSON config")?
        };

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = if is_yaml(path.as_ref()) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Check values that would make every request fail
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Find configuration file in standard locations
    pub fn find() -> Option<PathBuf> {
        CONFIG_LOCATIONS
            .iter()
            .map(|location| expand_path(location))
            .find(|path| path.exists())
    }

    /// Resolve configuration: explicit path, then environment, then standard
    /// locations, then defaults. Environment values override file values.
    pub fn resolve(explicit: Option<&Path>, env: &EnvConfig) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env.config_file.as_ref().map(PathBuf::from))
            .or_else(Self::find);

        let mut config = match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Self::load(&path)
                    .with_context(|| format!("Invalid configuration in {}", path.display()))?
            }
            None => {
                debug!("No configuration file found, using defaults");
                Self::default()
            }
        };

        if env.has_any() {
            debug!("Applying environment overrides");
            config.apply_env(env);
        }
        Ok(config)
    }

    /// Override fields set in the environment
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(url) = &env.base_url {
            self.base_url = url.clone();
        }
        if let Some(timeout) = env.timeout {
            self.timeout_secs = timeout;
        }
        if let Some(cleanup) = env.cleanup {
            self.cleanup = cleanup;
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

/// Expand `~/` to the home directory
fn expand_path(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}
