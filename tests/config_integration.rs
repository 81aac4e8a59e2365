use docecm::config::{ClientConfig, LogFormat};
use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        for var in [
            "CONFIG_FILE",
            "DOCECM_API_URL",
            "DOCECM_DEFAULT_LANGUAGE",
            "DOCECM_STATE_FILE",
            "DOCECM_LOG_FORMAT",
            "DOCECM_TIMEOUT_SECS",
            "DOCECM_API__URL",
            "DOCECM_API__DEFAULT_LANGUAGE",
            "DOCECM_HTTP__TIMEOUT_SECS",
            "DOCECM_SESSION__STATE_FILE",
            "DOCECM_SESSION__PERSIST",
            "DOCECM_LOGGING__FORMAT",
        ] {
            env::remove_var(var);
        }
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = ClientConfig::load_from_args(["docecm"]).expect("defaults should load");

    assert_eq!(config.api.url, "http://localhost:8080");
    assert_eq!(config.api.default_language, "auto");
    assert_eq!(config.http.timeout_secs, 30);
    assert_eq!(config.session.state_file, PathBuf::from(".docecm/session.json"));
    assert!(config.session.persist);
    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert!(config.plugins.file.is_none());
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("DOCECM_HTTP__TIMEOUT_SECS", "5");
        env::set_var("DOCECM_LOGGING__FORMAT", "json");
        env::set_var("DOCECM_SESSION__PERSIST", "false");
    }

    let config = ClientConfig::load_from_args(["docecm"]).expect("Failed to load config");
    assert_eq!(config.http.timeout_secs, 5);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert!(!config.session.persist);

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("docecm.yaml");
    fs::write(
        &file_path,
        r#"
api:
  url: "https://ecm.example.com"
  default_language: "ro"
plugins:
  file: "plugins.json"
    "#,
    )
    .expect("Failed to write temp config");

    unsafe {
        env::set_var("CONFIG_FILE", &file_path);
    }

    let config = ClientConfig::load_from_args(["docecm"]).expect("Failed to load config from file");
    assert_eq!(config.api.url, "https://ecm.example.com");
    assert_eq!(config.api.default_language, "ro");
    assert_eq!(config.plugins.file, Some(PathBuf::from("plugins.json")));
    // untouched keys keep their defaults
    assert_eq!(config.http.timeout_secs, 30);

    clear_env_vars();
}

#[test]
#[serial]
fn test_priority_cli_over_env_over_file() {
    clear_env_vars();

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("docecm.yaml");
    fs::write(
        &file_path,
        "api:\n  url: \"http://from-file\"\nhttp:\n  timeout_secs: 11\n",
    )
    .unwrap();

    unsafe {
        env::set_var("DOCECM_API__URL", "http://from-env");
        env::set_var("DOCECM_HTTP__TIMEOUT_SECS", "12");
    }

    let config = ClientConfig::load_from_args([
        "docecm",
        "--config",
        file_path.to_str().unwrap(),
        "--api-url",
        "http://from-cli",
    ])
    .expect("Failed to load config");

    assert_eq!(config.api.url, "http://from-cli");
    assert_eq!(config.http.timeout_secs, 12);

    clear_env_vars();
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env_vars();

    let result = ClientConfig::load_from_args(["docecm", "--config", "/nonexistent/docecm.yaml"]);
    assert!(result.is_err());
}
