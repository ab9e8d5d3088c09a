use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::poller::{Observer, PollError};

/// Environment variables checked, in order, when the config has no API key.
const API_KEY_VARS: [&str; 2] = ["N2YO_API_KEY", "SATELLITE_API_KEY"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid provider timeout {value:?}: {source}")]
    InvalidTimeout {
        value: String,
        source: humantime::DurationError,
    },
    #[error("provider client: {0}")]
    Provider(#[from] PollError),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    /// Observer used by live polls unless the request overrides it.
    #[serde(default)]
    pub observer: Observer,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Human readable, e.g. `10s` or `1m 30s`.
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.n2yo.com/rest/v1/satellite".to_string()
}

fn default_timeout() -> String {
    "10s".to_string()
}

impl ProviderConfig {
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        humantime::parse_duration(self.timeout.trim()).map_err(|source| {
            ConfigError::InvalidTimeout {
                value: self.timeout.clone(),
                source,
            }
        })
    }

    /// The configured key, else the first non-empty key from the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                API_KEY_VARS
                    .iter()
                    .find_map(|var| std::env::var(var).ok().filter(|k| !k.trim().is_empty()))
            })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    #[serde(default = "default_true")]
    pub default_satellites: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            default_satellites: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.provider.timeout()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let config = Config::default();
        assert_eq!(config.web.bind, "0.0.0.0:8080");
        assert_eq!(config.observer, Observer::default());
        assert_eq!(config.provider.timeout().unwrap(), Duration::from_secs(10));
        assert!(config.seed.default_satellites);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = Config::from_yaml(
            "web:\n  bind: 127.0.0.1:9000\nobserver:\n  latitude: 48.1\nprovider:\n  api_key: abc\n  timeout: 1m 30s\nseed:\n  default_satellites: false\n",
        )
        .unwrap();
        assert_eq!(config.web.bind, "127.0.0.1:9000");
        assert_eq!(config.observer.latitude, 48.1);
        assert_eq!(config.observer.longitude, -0.1278);
        assert_eq!(config.provider.base_url, "https://api.n2yo.com/rest/v1/satellite");
        assert_eq!(config.provider.timeout().unwrap(), Duration::from_secs(90));
        assert_eq!(config.provider.resolve_api_key().as_deref(), Some("abc"));
        assert!(!config.seed.default_satellites);
    }

    #[test]
    fn empty_document_is_default() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.web.bind, "0.0.0.0:8080");
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = Config::from_yaml("provider:\n  timeout: soon\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout { .. }));
    }
}
