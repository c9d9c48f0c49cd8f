//! Provider profile: the configured provider selection and its validation.

use crate::error::ApiError;
use crate::provider::{CompletionOptions, ModelProvider};
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Supported provider backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Gemini,
    OpenAI,
    Ollama,
    #[serde(rename = "local")]
    LocalCustom,
}

impl ProviderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Gemini => "gemini",
            ProviderType::OpenAI => "openai",
            ProviderType::Ollama => "ollama",
            ProviderType::LocalCustom => "local",
        }
    }

    /// Environment variable consulted when no key is configured.
    pub fn api_key_env_var(&self) -> Option<&'static str> {
        match self {
            ProviderType::Gemini => Some("GEMINI_API_KEY"),
            ProviderType::OpenAI => Some("OPENAI_API_KEY"),
            ProviderType::Ollama | ProviderType::LocalCustom => None,
        }
    }

    pub fn requires_api_key(&self) -> bool {
        self.api_key_env_var().is_some()
    }
}

/// Provider configuration as read from config files and environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_type")]
    pub provider_type: ProviderType,

    #[serde(default = "default_model")]
    pub model: String,

    /// Falls back to the provider's key environment variable when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub default_options: CompletionOptions,
}

fn default_provider_type() -> ProviderType {
    ProviderType::Gemini
}

fn default_model() -> String {
    "gemini-pro".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            model: default_model(),
            api_key: None,
            endpoint: None,
            default_options: CompletionOptions::default(),
        }
    }
}

/// Prefix scheme-less endpoints with `http://` (local servers rarely speak TLS).
pub fn normalize_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim();
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

impl ProviderConfig {
    /// Configured key, else the provider's environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                self.provider_type
                    .api_key_env_var()
                    .and_then(|var| std::env::var(var).ok())
                    .filter(|key| !key.trim().is_empty())
            })
    }

    fn normalized_endpoint(&self) -> Option<String> {
        self.endpoint.as_deref().map(normalize_endpoint)
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("Model cannot be empty".to_string());
        }

        if let Some(endpoint) = self.normalized_endpoint() {
            Url::parse(&endpoint).map_err(|e| format!("Invalid endpoint URL '{}': {}", endpoint, e))?;
        } else if self.provider_type == ProviderType::LocalCustom {
            return Err("Local provider requires an endpoint".to_string());
        }

        if let Some(temperature) = self.default_options.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(format!(
                    "Temperature must be between 0.0 and 2.0, got {}",
                    temperature
                ));
            }
        }

        if self.provider_type.requires_api_key() && self.resolve_api_key().is_none() {
            return Err(format!(
                "API key required; set provider.api_key or {}",
                self.provider_type.api_key_env_var().unwrap_or("an API key variable")
            ));
        }

        Ok(())
    }

    /// Resolve credentials and endpoint into a concrete `ModelProvider`
    pub fn to_model_provider(&self) -> Result<ModelProvider, ApiError> {
        let model = self.model.clone();
        let endpoint = self.normalized_endpoint();
        let missing_key = || {
            ApiError::ProviderNotConfigured(format!(
                "No API key for {} provider; set provider.api_key or {}",
                self.provider_type.as_str(),
                self.provider_type.api_key_env_var().unwrap_or("an API key variable")
            ))
        };

        match self.provider_type {
            ProviderType::Gemini => Ok(ModelProvider::Gemini {
                model,
                api_key: self.resolve_api_key().ok_or_else(missing_key)?,
                base_url: endpoint,
            }),
            ProviderType::OpenAI => Ok(ModelProvider::OpenAI {
                model,
                api_key: self.resolve_api_key().ok_or_else(missing_key)?,
                base_url: endpoint,
            }),
            ProviderType::Ollama => Ok(ModelProvider::Ollama {
                model,
                base_url: endpoint,
            }),
            ProviderType::LocalCustom => Ok(ModelProvider::LocalCustom {
                model,
                endpoint: endpoint.ok_or_else(|| {
                    ApiError::ProviderNotConfigured(
                        "Local provider requires an endpoint".to_string(),
                    )
                })?,
                api_key: self.resolve_api_key(),
            }),
        }
    }
}
