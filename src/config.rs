//! Runtime configuration for outbound requests.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! command-line flags and environment variables (see the binary's `--help`).
//! The result is built once at start-up and shared by reference with every run.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;
use tracing::{info, instrument};

/// Desktop browser identity sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_RENDER_ENDPOINT: &str = "https://api.scraperapi.com/";

/// Settings for the third-party rendering proxy that executes client-side
/// scripts before returning HTML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderProxyConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub api_key: Option<String>,
}

impl Default for RenderProxyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: DEFAULT_RENDER_ENDPOINT.to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub render_proxy: RenderProxyConfig,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            render_proxy: RenderProxyConfig::default(),
        }
    }
}

/// Command-line and environment overrides. `None` keeps the file/default value.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
    pub render_proxy_enabled: Option<bool>,
    pub render_proxy_endpoint: Option<String>,
    pub render_proxy_api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("user agent must not be empty")]
    EmptyUserAgent,
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
    #[error("render proxy is enabled but no API key is configured")]
    MissingProxyKey,
}

impl ScrapeConfig {
    /// Parse a YAML document. Missing keys fall back to defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load the optional YAML file, apply overrides and validate.
    #[instrument(level = "info", skip(overrides))]
    pub async fn load(path: Option<&str>, overrides: Overrides) -> Result<Self, Box<dyn Error>> {
        let mut config = match path {
            Some(path) => {
                let yaml = tokio::fs::read_to_string(path).await?;
                info!(path, "Loaded configuration file");
                Self::from_yaml(&yaml)?
            }
            None => Self::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(user_agent) = overrides.user_agent {
            self.user_agent = user_agent;
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(enabled) = overrides.render_proxy_enabled {
            self.render_proxy.enabled = enabled;
        }
        if let Some(endpoint) = overrides.render_proxy_endpoint {
            self.render_proxy.endpoint = endpoint;
        }
        if let Some(api_key) = overrides.render_proxy_api_key {
            self.render_proxy.api_key = Some(api_key);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyUserAgent);
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        let has_key = self
            .render_proxy
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty());
        if self.render_proxy.enabled && !has_key {
            return Err(ConfigError::MissingProxyKey);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScrapeConfig::default();
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(!config.render_proxy.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ScrapeConfig::from_yaml("timeout_secs: 5\n").unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.render_proxy.endpoint, DEFAULT_RENDER_ENDPOINT);
    }

    #[test]
    fn test_nested_yaml() {
        let yaml = r#"
user_agent: "TestAgent/1.0"
render_proxy:
  enabled: true
  api_key: "secret"
"#;
        let config = ScrapeConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.user_agent, "TestAgent/1.0");
        assert!(config.render_proxy.enabled);
        assert_eq!(config.render_proxy.api_key.as_deref(), Some("secret"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_win() {
        let mut config = ScrapeConfig::default();
        config.apply(Overrides {
            user_agent: Some("Override/2.0".to_string()),
            timeout_secs: Some(7),
            ..Overrides::default()
        });
        assert_eq!(config.user_agent, "Override/2.0");
        assert_eq!(config.timeout_secs, 7);
    }

    #[test]
    fn test_validation_errors() {
        let mut config = ScrapeConfig::default();
        config.timeout_secs = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));

        let mut config = ScrapeConfig::default();
        config.user_agent = "  ".to_string();
        assert_eq!(config.validate(), Err(ConfigError::EmptyUserAgent));

        let mut config = ScrapeConfig::default();
        config.render_proxy.enabled = true;
        assert_eq!(config.validate(), Err(ConfigError::MissingProxyKey));
    }

    #[tokio::test]
    async fn test_load_without_file() {
        let config = ScrapeConfig::load(None, Overrides::default()).await.unwrap();
        assert_eq!(config, ScrapeConfig::default());
    }
}
