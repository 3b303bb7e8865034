//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "MARKET_API_CHECK";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Base URL from MARKET_API_CHECK_BASE_URL
    pub base_url: Option<String>,
    /// Timeout from MARKET_API_CHECK_TIMEOUT
    pub timeout: Option<u64>,
    /// Config file from MARKET_API_CHECK_CONFIG
    pub config_file: Option<String>,
    /// Log level from MARKET_API_CHECK_LOG
    pub log_level: Option<String>,
    /// Output format from MARKET_API_CHECK_FORMAT
    pub format: Option<String>,
    /// Cleanup toggle from MARKET_API_CHECK_CLEANUP
    pub cleanup: Option<bool>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}_{name}"));

        Self {
            base_url: get("BASE_URL"),
            timeout: get("TIMEOUT").and_then(|v| v.parse().ok()),
            config_file: get("CONFIG"),
            log_level: get("LOG"),
            format: get("FORMAT"),
            cleanup: get("CLEANUP").map(|v| parse_bool(&v)),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.base_url.is_some()
            || self.timeout.is_some()
            || self.config_file.is_some()
            || self.log_level.is_some()
            || self.format.is_some()
            || self.cleanup.is_some()
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "enabled"
    )
}

/// Help text listing the supported environment variables
pub fn env_help() -> String {
    format!(
        "Environment Variables:\n  \
         {ENV_PREFIX}_BASE_URL   API base URL\n  \
         {ENV_PREFIX}_TIMEOUT    Request timeout in seconds\n  \
         {ENV_PREFIX}_CONFIG     Path to configuration file\n  \
         {ENV_PREFIX}_LOG        Log level (trace, debug, info, warn, error)\n  \
         {ENV_PREFIX}_FORMAT     Summary format (table, json, json-pretty, summary)\n  \
         {ENV_PREFIX}_CLEANUP    Delete created products after the run (true/false)"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_config_default() {
        let config = EnvConfig::default();
        assert!(config.base_url.is_none());
        assert!(!config.has_any());
    }

    #[test]
    fn test_from_lookup() {
        let config = EnvConfig::from_lookup(lookup(&[
            ("MARKET_API_CHECK_BASE_URL", "http://localhost:3000/api"),
            ("MARKET_API_CHECK_TIMEOUT", "10"),
            ("MARKET_API_CHECK_CLEANUP", "off"),
        ]));

        assert_eq!(config.base_url.as_deref(), Some("http://localhost:3000/api"));
        assert_eq!(config.timeout, Some(10));
        assert_eq!(config.cleanup, Some(false));
        assert!(config.has_any());
    }

    #[test]
    fn test_invalid_timeout_is_ignored() {
        let config = EnvConfig::from_lookup(lookup(&[("MARKET_API_CHECK_TIMEOUT", "soon")]));
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_bool_parsing() {
        assert!(parse_bool("YES"));
        assert!(parse_bool("1"));
        assert!(!parse_bool("no"));
    }

    #[test]
    fn test_env_help_mentions_prefix() {
        assert!(env_help().contains("MARKET_API_CHECK_BASE_URL"));
    }
}
