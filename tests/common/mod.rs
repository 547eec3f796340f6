use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::MockServer;

use medai::config::ServiceConfig;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Service configuration pointing at `/chat` on the mock server
#[allow(dead_code)]
pub fn service_config(server: &MockServer) -> ServiceConfig {
    ServiceConfig {
        endpoint: format!("{}/chat", server.uri()),
        ..Default::default()
    }
}
