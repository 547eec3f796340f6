//! Error types for MedAI
//!
//! This module defines the error types used throughout the application,
//! using `thiserror` for ergonomic error handling.
//!
//! Failures of the answering service never reach the presentation layer as
//! errors: the send pipeline converts them into conversation state. The
//! variants below cover the remaining fallible surfaces (configuration,
//! terminal I/O, the `ask`/`status` commands).

use thiserror::Error;

/// Main error type for MedAI operations
#[derive(Error, Debug)]
pub enum MedaiError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Answering service errors (status codes, malformed bodies)
    #[error("Answering service error: {0}")]
    Service(String),

    /// Answering service returned a non-success HTTP status
    #[error("Answering service returned HTTP {status}: {body}")]
    ServiceStatus {
        /// HTTP status code returned by the service
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Interactive command errors
    #[error("Command error: {0}")]
    Command(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing errors
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Line editor errors
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Result type alias for MedAI operations
///
/// Uses `anyhow::Error` so call sites can attach context while still
/// downcasting to [`MedaiError`] where the variant matters.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = MedaiError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_service_error_display() {
        let error = MedaiError::Service("missing body".to_string());
        assert_eq!(error.to_string(), "Answering service error: missing body");
    }

    #[test]
    fn test_service_status_error_display() {
        let error = MedaiError::ServiceStatus {
            status: 500,
            body: "Internal server error".to_string(),
        };
        let s = error.to_string();
        assert!(s.contains("HTTP 500"));
        assert!(s.contains("Internal server error"));
    }

    #[test]
    fn test_command_error_display() {
        let error = MedaiError::Command("no such conversation".to_string());
        assert_eq!(error.to_string(), "Command error: no such conversation");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: MedaiError = io_error.into();
        assert!(matches!(error, MedaiError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: MedaiError = json_error.into();
        assert!(matches!(error, MedaiError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: MedaiError = yaml_error.into();
        assert!(matches!(error, MedaiError::Yaml(_)));
    }

    #[test]
    fn test_url_error_conversion() {
        let url_error = url::Url::parse("not a url").unwrap_err();
        let error: MedaiError = url_error.into();
        assert!(matches!(error, MedaiError::Url(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MedaiError>();
    }
}
