use docchat::config::{AppConfig, DEFAULT_BASE_URL};
use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("DOCCHAT_BACKEND__BASE_URL");
        env::remove_var("DOCCHAT_NOTIFICATIONS__TTL_MS");
        env::remove_var("API_BASE_URL");
        env::remove_var("STATE_FILE");
        env::remove_var("LOG_JSON");
        env::remove_var("CONFIG_FILE");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args(["docchat"]).expect("defaults should load");
    assert_eq!(config.backend.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.reveal.floor_ms, 20);
    assert_eq!(config.reveal.base_ms, 50);
    assert_eq!(config.reveal.divisor, 20);
    assert_eq!(config.notifications.ttl_ms, 4000);
    assert!(!config.logging.json);
    assert!(config.storage.path.is_none());
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("DOCCHAT_BACKEND__BASE_URL", "http://10.0.0.2:9000");
        env::set_var("DOCCHAT_NOTIFICATIONS__TTL_MS", "1500");
    }

    let config = AppConfig::load_from_args(["docchat"]).expect("Failed to load config");
    assert_eq!(config.backend.base_url, "http://10.0.0.2:9000");
    assert_eq!(config.notifications.ttl_ms, 1500);

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_beats_env() {
    clear_env_vars();
    unsafe {
        env::set_var("DOCCHAT_BACKEND__BASE_URL", "http://from-env:8000");
    }

    let config = AppConfig::load_from_args([
        "docchat",
        "--backend-url",
        "http://from-cli:8000",
        "--state-file",
        "/tmp/docchat-state.json",
        "--no-animation",
    ])
    .expect("Failed to load config");
    assert_eq!(config.backend.base_url, "http://from-cli:8000");
    assert_eq!(
        config.storage.resolved_path(),
        PathBuf::from("/tmp/docchat-state.json")
    );
    assert_eq!(config.reveal.base_ms, 0);
    assert_eq!(config.reveal.floor_ms, 0);

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("client.yaml");
    fs::write(
        &file_path,
        r#"
backend:
  base_url: "http://files.example:7070"
reveal:
  floor_ms: 10
"#,
    )
    .expect("Failed to write temp config");

    // Tell AppConfig to use this file via Env Var (mocking CLI arg indirectly)
    unsafe {
        env::set_var("CONFIG_FILE", &file_path);
    }

    let config = AppConfig::load_from_args(["docchat"]).expect("Failed to load config from file");
    assert_eq!(config.backend.base_url, "http://files.example:7070");
    assert_eq!(config.reveal.floor_ms, 10);
    assert_eq!(config.reveal.base_ms, 50);

    clear_env_vars();
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args(["docchat", "--config", "/nonexistent/docchat.yaml"]);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_unknown_flag_is_an_error() {
    clear_env_vars();

    assert!(AppConfig::load_from_args(["docchat", "--bogus"]).is_err());
}
