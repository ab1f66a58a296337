//! Tests for Config defaults, serialization and persistence

use esap_config::{
    AgentDefaults, Config, ConfigError, ProviderConfig, ServiceConfig, HRMS_TOKEN_ENV,
    OPENROUTER_KEY_ENV, SCM_TOKEN_ENV,
};
use serial_test::serial;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.agent.model, "google/gemini-2.0-flash-001");
    assert_eq!(config.agent.max_tokens, 4096);
    assert_eq!(config.agent.temperature, 0.7);
    assert_eq!(config.agent.max_tool_iterations, 10);

    assert_eq!(config.services.hrms.base_url, "https://esapdev.xyz:7002/api");
    assert_eq!(config.services.scm.base_url, "https://esapdev.xyz:7005/api/v1");
    assert!(config.services.hrms.api_token.is_empty());
    assert_eq!(
        config.services.weather.geocoding_url,
        "https://geocoding-api.open-meteo.com/v1/search"
    );
    assert_eq!(
        config.services.weather.forecast_url,
        "https://api.open-meteo.com/v1/forecast"
    );
    assert_eq!(config.services.timeout_secs, 30);
    assert_eq!(config.request_timeout().as_secs(), 30);
}

#[test]
fn test_agent_defaults_match_config_defaults() {
    let defaults = AgentDefaults::default();
    assert_eq!(defaults.model, Config::default().default_model());
}

#[test]
fn test_partial_json_fills_defaults() {
    let json = r#"{
        "services": {
            "hrms": { "base_url": "http://localhost:9000/api", "api_token": "hr-token" }
        }
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.services.hrms.base_url, "http://localhost:9000/api");
    assert_eq!(config.services.hrms.api_token, "hr-token");
    // untouched sections keep their defaults
    assert_eq!(config.services.scm.base_url, "https://esapdev.xyz:7005/api/v1");
    assert_eq!(config.services.timeout_secs, 30);
    assert_eq!(config.agent.max_tool_iterations, 10);
}

#[test]
fn test_empty_object_is_default_config() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config.agent.model, "google/gemini-2.0-flash-001");
    assert!(config.providers.openrouter.api_key.is_empty());
}

#[test]
fn test_provider_config_skips_missing_base() {
    let provider = ProviderConfig {
        api_key: "k".to_string(),
        api_base: None,
    };
    let json = serde_json::to_string(&provider).unwrap();
    assert!(!json.contains("api_base"));
}

#[tokio::test]
async fn test_save_and_load_round_trip() {
    let dir = temp_dir();
    let path = dir.path().join("nested").join("config.json");

    let mut config = Config::default();
    config.agent.model = "test/model".to_string();
    config.services.scm.api_token = "scm-token".to_string();
    config.services.timeout_secs = 5;

    config.save_to(&path).await.unwrap();
    assert!(path.exists());

    let loaded = Config::load_from(&path).await.unwrap();
    assert_eq!(loaded.agent.model, "test/model");
    assert_eq!(loaded.services.scm.api_token, "scm-token");
    assert_eq!(loaded.services.timeout_secs, 5);
}

#[tokio::test]
async fn test_load_missing_file_uses_defaults() {
    let dir = temp_dir();
    let path = dir.path().join("does-not-exist.json");

    let config = Config::load_from(&path).await.unwrap();
    assert_eq!(config.services.timeout_secs, 30);
}

#[tokio::test]
async fn test_load_invalid_json_is_parse_error() {
    let dir = temp_dir();
    let path = dir.path().join("config.json");
    tokio::fs::write(&path, "{not json").await.unwrap();

    let err = Config::load_from(&path).await.unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
    assert!(err.to_string().starts_with("config parse error"));
}

#[test]
#[serial]
fn test_api_key_prefers_openrouter() {
    std::env::remove_var(OPENROUTER_KEY_ENV);
    let mut config = Config::default();
    assert!(!config.has_api_key());

    config.providers.openai.api_key = "openai-key".to_string();
    config.providers.openrouter.api_key = "sk-or-key".to_string();

    assert_eq!(config.api_key(), Some("sk-or-key".to_string()));
    assert_eq!(
        config.api_base(),
        Some("https://openrouter.ai/api/v1".to_string())
    );
}

#[test]
#[serial]
fn test_api_key_env_fallback() {
    std::env::set_var(OPENROUTER_KEY_ENV, "env-key");
    let config = Config::default();
    assert_eq!(config.api_key(), Some("env-key".to_string()));
    std::env::remove_var(OPENROUTER_KEY_ENV);
}

#[test]
#[serial]
fn test_vllm_base_used_without_keys() {
    std::env::remove_var(OPENROUTER_KEY_ENV);
    let mut config = Config::default();
    config.providers.vllm.api_base = Some("http://localhost:8000/v1".to_string());

    assert_eq!(config.api_base(), Some("http://localhost:8000/v1".to_string()));
}

#[test]
#[serial]
fn test_service_token_from_file_wins_over_env() {
    std::env::set_var(HRMS_TOKEN_ENV, "env-token");
    let service = ServiceConfig {
        base_url: "http://x".to_string(),
        api_token: "file-token".to_string(),
    };
    assert_eq!(service.token(HRMS_TOKEN_ENV), Some("file-token".to_string()));
    std::env::remove_var(HRMS_TOKEN_ENV);
}

#[test]
#[serial]
fn test_service_token_env_fallback() {
    std::env::remove_var(SCM_TOKEN_ENV);
    let config = Config::default();
    assert_eq!(config.scm_token(), None);

    std::env::set_var(SCM_TOKEN_ENV, "scm-env");
    assert_eq!(config.scm_token(), Some("scm-env".to_string()));

    std::env::set_var(SCM_TOKEN_ENV, "");
    assert_eq!(config.scm_token(), None);
    std::env::remove_var(SCM_TOKEN_ENV);
}
