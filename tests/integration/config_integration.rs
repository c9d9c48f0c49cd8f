//! Integration tests for the configuration system

use skyinsight::config::{ConfigLoader, InsightConfig, ProviderType};
use skyinsight::error::ApiError;
use skyinsight::provider::{ModelProvider, ProviderFactory};
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

// Serializes access to process environment across tests in this binary
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Run `f` with XDG_CONFIG_HOME pointed at `config_home` and the given extra
/// variables set, restoring everything afterwards.
fn with_env<R>(config_home: &Path, vars: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let mut names: Vec<&str> = vec!["XDG_CONFIG_HOME"];
    names.extend(vars.iter().map(|(k, _)| *k));
    let saved: Vec<(String, Option<String>)> = names
        .iter()
        .map(|k| (k.to_string(), std::env::var(k).ok()))
        .collect();

    std::env::set_var("XDG_CONFIG_HOME", config_home);
    for (key, value) in vars {
        std::env::set_var(key, value);
    }

    let result = f();

    for (key, value) in saved {
        match value {
            Some(v) => std::env::set_var(&key, v),
            None => std::env::remove_var(&key),
        }
    }
    result
}

fn write(path: &Path, contents: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("skyinsight.toml");
    write(
        &config_file,
        r#"
[provider]
provider_type = "ollama"
model = "llama3"
endpoint = "http://localhost:11434"

[provider.default_options]
max_tokens = 2048

[logging]
level = "debug"
format = "json"
"#,
    );

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.provider.provider_type, ProviderType::Ollama);
    assert_eq!(config.provider.model, "llama3");
    assert_eq!(config.provider.default_options.max_tokens, Some(2048));
    assert_eq!(config.provider.default_options.temperature, Some(1.0));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.logging.output, "stderr");

    let client = ProviderFactory::from_config(&config.provider).unwrap();
    assert_eq!(client.provider_name(), "ollama");
    assert_eq!(client.model_name(), "llama3");
}

#[test]
fn test_load_from_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let err = ConfigLoader::load_from_file(&temp_dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ApiError::ConfigError(_)));
}

#[test]
fn test_load_defaults_without_files() {
    let temp_dir = TempDir::new().unwrap();
    let config = with_env(&temp_dir.path().join("xdg"), &[], || {
        ConfigLoader::load(&temp_dir.path().join("ws")).unwrap()
    });
    assert_eq!(config, InsightConfig::default());
}

#[test]
fn test_workspace_config_overrides_global_config() {
    let temp_dir = TempDir::new().unwrap();
    let xdg = temp_dir.path().join("xdg");
    let workspace = temp_dir.path().join("ws");

    write(
        &xdg.join("skyinsight").join("config.toml"),
        r#"
[provider]
provider_type = "openai"
model = "global-model"
api_key = "global-key"
"#,
    );
    write(
        &workspace.join("config").join("config.toml"),
        r#"
[provider]
model = "workspace-model"
"#,
    );

    let config = with_env(&xdg, &[], || {
        assert_eq!(
            ConfigLoader::global_config_path().unwrap(),
            xdg.join("skyinsight").join("config.toml")
        );
        ConfigLoader::load(&workspace).unwrap()
    });

    assert_eq!(config.provider.provider_type, ProviderType::OpenAI);
    assert_eq!(config.provider.model, "workspace-model");
    assert_eq!(config.provider.api_key.as_deref(), Some("global-key"));
}

#[test]
fn test_environment_specific_file_and_env_overrides() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = temp_dir.path().join("ws");

    write(
        &workspace.join("config").join("config.toml"),
        r#"
[provider]
provider_type = "ollama"
model = "base-model"

[logging]
level = "info"
"#,
    );
    write(
        &workspace.join("config").join("staging.toml"),
        r#"
[logging]
level = "debug"
"#,
    );

    let config = with_env(
        &temp_dir.path().join("xdg"),
        &[
            ("SKYINSIGHT_ENV", "staging"),
            ("SKYINSIGHT__PROVIDER__MODEL", "env-model"),
        ],
        || ConfigLoader::load(&workspace).unwrap(),
    );

    assert_eq!(config.provider.provider_type, ProviderType::Ollama);
    assert_eq!(config.provider.model, "env-model");
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_api_key_resolved_from_environment() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = temp_dir.path().join("ws");

    let provider = with_env(
        &temp_dir.path().join("xdg"),
        &[("GEMINI_API_KEY", "env-gemini-key")],
        || {
            let config = ConfigLoader::load(&workspace).unwrap();
            assert!(config.provider.api_key.is_none());
            assert!(config.validate().is_ok());
            config.provider.to_model_provider().unwrap()
        },
    );

    match provider {
        ModelProvider::Gemini { api_key, model, .. } => {
            assert_eq!(api_key, "env-gemini-key");
            assert_eq!(model, "gemini-pro");
        }
        other => panic!("Wrong provider type: {:?}", other),
    }
}
