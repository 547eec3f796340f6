//! Configuration management for MedAI
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{MedaiError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for MedAI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Answering service connection settings
    #[serde(default)]
    pub service: ServiceConfig,
    /// Interactive chat presentation settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Answering service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// URL that accepts `POST {"question": ...}`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Optional health check URL; defaults to the endpoint's origin
    #[serde(default)]
    pub health_url: Option<String>,

    /// Optional request timeout in seconds
    ///
    /// Unset by default: a request that never settles keeps the session
    /// busy until it does.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_endpoint() -> String {
    "http://localhost:8000/chat".to_string()
}

fn default_user_agent() -> String {
    format!("medai/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            health_url: None,
            timeout_seconds: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Chat presentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Show example questions when a conversation is empty
    #[serde(default = "default_true")]
    pub show_examples: bool,

    /// Show the educational-use disclaimer on startup
    #[serde(default = "default_true")]
    pub show_disclaimer: bool,

    /// Print capture times next to messages
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            show_examples: true,
            show_disclaimer: true,
            show_timestamps: true,
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| MedaiError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| MedaiError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(endpoint) = std::env::var("MEDAI_ENDPOINT") {
            self.service.endpoint = endpoint;
        }

        if let Ok(health_url) = std::env::var("MEDAI_HEALTH_URL") {
            self.service.health_url = Some(health_url);
        }

        if let Ok(timeout) = std::env::var("MEDAI_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.service.timeout_seconds = Some(value);
            } else {
                tracing::warn!("Invalid MEDAI_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(show) = std::env::var("MEDAI_SHOW_EXAMPLES") {
            match show.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.chat.show_examples = true,
                "0" | "false" | "no" | "off" => self.chat.show_examples = false,
                _ => tracing::warn!("Invalid MEDAI_SHOW_EXAMPLES: {}", show),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(endpoint) = &cli.endpoint {
            tracing::debug!("Using endpoint override from CLI: {}", endpoint);
            self.service.endpoint = endpoint.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint is not an http(s) URL, the health URL
    /// is malformed, or the timeout is zero
    pub fn validate(&self) -> Result<()> {
        if self.service.endpoint.trim().is_empty() {
            return Err(MedaiError::Config("service.endpoint cannot be empty".to_string()).into());
        }

        let endpoint = url::Url::parse(&self.service.endpoint).map_err(|e| {
            MedaiError::Config(format!(
                "service.endpoint is not a valid URL ({}): {}",
                self.service.endpoint, e
            ))
        })?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(MedaiError::Config(format!(
                "service.endpoint must use http or https, got {}",
                endpoint.scheme()
            ))
            .into());
        }

        if let Some(health_url) = &self.service.health_url {
            url::Url::parse(health_url).map_err(|e| {
                MedaiError::Config(format!(
                    "service.health_url is not a valid URL ({}): {}",
                    health_url, e
                ))
            })?;
        }

        if self.service.timeout_seconds == Some(0) {
            return Err(MedaiError::Config(
                "service.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use serial_test::serial;

    fn cli_with_endpoint(endpoint: Option<&str>) -> Cli {
        Cli {
            config: None,
            verbose: false,
            json_logs: false,
            endpoint: endpoint.map(str::to_string),
            command: Commands::Status,
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.endpoint, "http://localhost:8000/chat");
        assert!(config.service.timeout_seconds.is_none());
        assert!(config.chat.show_examples);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_endpoint() {
        let mut config = Config::default();
        config.service.endpoint = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_rejects_non_http_scheme() {
        let mut config = Config::default();
        config.service.endpoint = "ftp://example.com/chat".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = Config::default();
        config.service.timeout_seconds = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_health_url() {
        let mut config = Config::default();
        config.service.health_url = Some("nope".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
service:
  endpoint: https://answers.example.com/chat
  timeout_seconds: 45
chat:
  show_examples: false
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.service.endpoint, "https://answers.example.com/chat");
        assert_eq!(config.service.timeout_seconds, Some(45));
        assert!(!config.chat.show_examples);
        assert!(config.chat.show_disclaimer);
        assert!(config.service.user_agent.starts_with("medai/"));
    }

    #[test]
    fn test_config_from_empty_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.service.endpoint, default_endpoint());
    }

    #[test]
    #[serial]
    fn test_load_nonexistent_file_uses_defaults() {
        std::env::remove_var("MEDAI_ENDPOINT");
        let config = Config::load("nonexistent.yaml", &cli_with_endpoint(None)).unwrap();
        assert_eq!(config.service.endpoint, default_endpoint());
    }

    #[test]
    #[serial]
    fn test_cli_endpoint_overrides_env() {
        std::env::set_var("MEDAI_ENDPOINT", "http://env.example.com/chat");
        let config = Config::load(
            "nonexistent.yaml",
            &cli_with_endpoint(Some("http://cli.example.com/chat")),
        )
        .unwrap();
        std::env::remove_var("MEDAI_ENDPOINT");

        assert_eq!(config.service.endpoint, "http://cli.example.com/chat");
    }

    #[test]
    #[serial]
    fn test_env_vars_override_file_values() {
        std::env::set_var("MEDAI_ENDPOINT", "http://env.example.com/chat");
        std::env::set_var("MEDAI_TIMEOUT_SECONDS", "12");
        std::env::set_var("MEDAI_SHOW_EXAMPLES", "off");

        let mut config = Config::default();
        config.apply_env_vars();

        std::env::remove_var("MEDAI_ENDPOINT");
        std::env::remove_var("MEDAI_TIMEOUT_SECONDS");
        std::env::remove_var("MEDAI_SHOW_EXAMPLES");

        assert_eq!(config.service.endpoint, "http://env.example.com/chat");
        assert_eq!(config.service.timeout_seconds, Some(12));
        assert!(!config.chat.show_examples);
    }

    #[test]
    #[serial]
    fn test_invalid_timeout_env_is_ignored() {
        std::env::set_var("MEDAI_TIMEOUT_SECONDS", "soon");
        let mut config = Config::default();
        config.apply_env_vars();
        std::env::remove_var("MEDAI_TIMEOUT_SECONDS");

        assert!(config.service.timeout_seconds.is_none());
    }
}
