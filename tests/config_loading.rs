//! Configuration loading tests
//!
//! Covers the file, environment and command line layers together.

mod common;

use clap::Parser;
use serial_test::serial;

use medai::cli::Cli;
use medai::config::Config;

use common::temp_config_file;

fn clear_env() {
    for key in [
        "MEDAI_ENDPOINT",
        "MEDAI_HEALTH_URL",
        "MEDAI_TIMEOUT_SECONDS",
        "MEDAI_SHOW_EXAMPLES",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_load_from_yaml_file() {
    clear_env();
    let (_dir, path) = temp_config_file(
        r#"
service:
  endpoint: "https://medai.example.com/chat"
  timeout_seconds: 30
chat:
  show_examples: false
"#,
    );
    let path = path.to_string_lossy().to_string();
    let cli = Cli::try_parse_from(["medai", "--config", &path, "status"]).unwrap();

    let config = Config::load(&path, &cli).unwrap();
    config.validate().unwrap();

    assert_eq!(config.service.endpoint, "https://medai.example.com/chat");
    assert_eq!(config.service.timeout_seconds, Some(30));
    assert!(!config.chat.show_examples);
    assert!(config.chat.show_disclaimer);
}

#[test]
#[serial]
fn test_env_then_cli_override_order() {
    clear_env();
    let (_dir, path) = temp_config_file("service:\n  endpoint: \"http://file:8000/chat\"\n");
    let path = path.to_string_lossy().to_string();

    std::env::set_var("MEDAI_ENDPOINT", "http://env:8000/chat");
    let cli = Cli::try_parse_from(["medai", "status"]).unwrap();
    let config = Config::load(&path, &cli).unwrap();
    assert_eq!(config.service.endpoint, "http://env:8000/chat");

    let cli =
        Cli::try_parse_from(["medai", "--endpoint", "http://cli:8000/chat", "status"]).unwrap();
    let config = Config::load(&path, &cli).unwrap();
    assert_eq!(config.service.endpoint, "http://cli:8000/chat");

    clear_env();
}

#[test]
#[serial]
fn test_malformed_yaml_is_error() {
    clear_env();
    let (_dir, path) = temp_config_file("service: [not, a, map");
    let path = path.to_string_lossy().to_string();
    let cli = Cli::try_parse_from(["medai", "status"]).unwrap();

    let err = Config::load(&path, &cli).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config"));
}

#[test]
#[serial]
fn test_loaded_config_with_bad_scheme_fails_validation() {
    clear_env();
    let (_dir, path) = temp_config_file("service:\n  endpoint: \"ftp://files/chat\"\n");
    let path = path.to_string_lossy().to_string();
    let cli = Cli::try_parse_from(["medai", "status"]).unwrap();

    let config = Config::load(&path, &cli).unwrap();
    assert!(config.validate().is_err());
}
