use super::data::{path_display, Config};
use super::endpoint::{EndpointConfig, EndpointStore};
use super::io::ConfigError;
use super::orchestrator::ConfigOrchestrator;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn config_orchestrator_detects_external_updates() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    let orchestrator = ConfigOrchestrator::new(config_path.clone());

    orchestrator
        .mutate(|config| config.set_endpoint("https://first.example.com/chat"))
        .expect("mutate failed");

    let persisted = Config::load_from_path(&config_path).expect("load failed");
    assert_eq!(persisted.endpoint(), "https://first.example.com/chat");

    let cached = orchestrator.load_with_cache().expect("cached load failed");
    assert_eq!(cached.endpoint(), "https://first.example.com/chat");

    std::thread::sleep(Duration::from_millis(1100));

    let external = Config {
        backend_endpoint: Some("https://second.example.com/chat".to_string()),
        ..Default::default()
    };
    external
        .save_to_path(&config_path)
        .expect("external save failed");

    let reloaded = orchestrator.load_with_cache().expect("reload failed");
    assert_eq!(reloaded.endpoint(), "https://second.example.com/chat");
}

#[test]
fn load_nonexistent_config_is_demo_mode() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert_eq!(config.endpoint(), "");
}

#[test]
fn endpoint_survives_a_fresh_store() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let first = EndpointConfig::new(Arc::new(ConfigOrchestrator::new(config_path.clone())));
    first.set(" https://coach.example.com/chat ");

    let reopened = EndpointConfig::new(Arc::new(ConfigOrchestrator::new(config_path.clone())));
    assert_eq!(reopened.get(), "https://coach.example.com/chat");

    let contents = fs::read_to_string(&config_path).expect("read config");
    assert!(contents.contains("backend_endpoint = \"https://coach.example.com/chat\""));
}

#[test]
fn clearing_the_endpoint_removes_the_key() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    let orchestrator = Arc::new(ConfigOrchestrator::new(config_path.clone()));

    orchestrator
        .mutate(|config| config.stream_chunk_size = Some(8))
        .expect("mutate failed");

    let endpoint = EndpointConfig::new(orchestrator.clone());
    endpoint.set("https://coach.example.com/chat");
    endpoint.clear();

    let persisted = Config::load_from_path(&config_path).expect("load failed");
    assert_eq!(persisted.backend_endpoint, None);
    assert_eq!(persisted.stream_chunk_size, Some(8));
}

#[test]
fn malformed_config_reports_parse_error_but_endpoint_falls_back() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "backend_endpoint = [not toml").expect("write");

    let orchestrator = Arc::new(ConfigOrchestrator::new(config_path.clone()));
    match orchestrator.load_endpoint() {
        Err(ConfigError::Parse { path, .. }) => assert_eq!(path, config_path),
        other => panic!("expected parse error, got {other:?}"),
    }

    let endpoint = EndpointConfig::new(orchestrator);
    assert_eq!(endpoint.get(), "");
    endpoint.set("https://coach.example.com/chat");
    assert_eq!(
        fs::read_to_string(&config_path).expect("read"),
        "backend_endpoint = [not toml"
    );
}

#[test]
fn whitespace_endpoint_counts_as_unset() {
    let mut config = Config::default();
    config.set_endpoint("   ");
    assert_eq!(config.backend_endpoint, None);

    let padded = Config {
        backend_endpoint: Some("  https://coach.example.com  ".to_string()),
        ..Default::default()
    };
    assert_eq!(padded.endpoint(), "https://coach.example.com");
}

#[test]
fn config_error_display_names_the_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "stream_chunk_size = \"many\"").expect("write");

    let err = Config::load_from_path(&config_path).expect_err("should fail");
    let message = err.to_string();
    assert!(message.starts_with("Failed to parse config at "));
    assert!(message.contains(&path_display(&config_path)));
}
