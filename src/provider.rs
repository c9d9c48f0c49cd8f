//! Model Provider Abstraction
//!
//! A single text-in/text-out interface over hosted and local generative-language
//! services (Gemini, OpenAI, Ollama, custom OpenAI-compatible servers). Clients are
//! built explicitly from configuration and injected into the orchestrator; there is
//! no process-wide client or embedded credential.

use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::trace;

pub mod profile;

pub use profile::{ProviderConfig, ProviderType};

/// Fully resolved provider selection, credentials included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ModelProvider {
    Gemini {
        model: String,
        api_key: String,
        base_url: Option<String>, // Default: https://generativelanguage.googleapis.com/v1beta
    },
    OpenAI {
        model: String,
        api_key: String,
        base_url: Option<String>, // For custom endpoints (e.g., Azure OpenAI)
    },
    Ollama {
        model: String,
        base_url: Option<String>, // Default: http://localhost:11434
    },
    LocalCustom {
        model: String,
        endpoint: String, // Full endpoint URL (e.g., http://localhost:8080/v1)
        api_key: Option<String>,
    },
}

/// Generation options applied to every request a client sends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>, // 0.0-2.0, default: 1.0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>, // Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>, // Nucleus sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>, // Stop sequences
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: Some(1.0),
            max_tokens: None,
            top_p: None,
            stop: None,
        }
    }
}

/// Model client trait
///
/// One attempt per call; retries, if any, belong to the caller.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send `prompt` and return the generated text
    async fn generate(&self, prompt: &str) -> Result<String, ApiError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;

    /// Get the model name
    fn model_name(&self) -> &str;
}

// OpenAI-compatible API request/response structures
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
    stream: bool,
}

#[derive(Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: OpenAIMessage,
}

impl<'a> ChatCompletionRequest<'a> {
    fn single_user_message(model: &'a str, prompt: &str, options: &CompletionOptions) -> Self {
        Self {
            model,
            messages: vec![OpenAIMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            stop: options.stop.clone(),
            stream: false,
        }
    }
}

// Gemini generateContent request/response structures
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

impl GenerateContentRequest {
    fn new(prompt: &str, options: &CompletionOptions) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: options.temperature,
                max_output_tokens: options.max_tokens,
                top_p: options.top_p,
                stop_sequences: options.stop.clone(),
            },
        }
    }
}

/// Concatenate the text parts of the first candidate.
fn gemini_text(response: GenerateContentResponse) -> Result<String, ApiError> {
    let content = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .ok_or_else(|| ApiError::ProviderError("No candidates in response".to_string()))?;

    let texts: Vec<String> = content.parts.into_iter().filter_map(|p| p.text).collect();
    if texts.is_empty() {
        return Err(ApiError::ProviderError(
            "No text parts in response candidate".to_string(),
        ));
    }
    Ok(texts.concat())
}

fn first_choice_text(response: ChatCompletionResponse) -> Result<String, ApiError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| ApiError::ProviderError("No choices in response".to_string()))
}

// Helper function to map HTTP errors to ApiError
fn map_http_error(error: reqwest::Error) -> ApiError {
    if let Some(status) = error.status() {
        status_error(status.as_u16(), error.to_string())
    } else if error.is_timeout() {
        ApiError::ProviderRequestFailed(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        ApiError::ProviderRequestFailed(format!("Connection error: {}", error))
    } else {
        ApiError::ProviderError(format!("HTTP error: {}", error))
    }
}

fn status_error(status: u16, detail: String) -> ApiError {
    match status {
        401 | 403 => ApiError::ProviderAuthFailed(format!("Authentication failed: {}", detail)),
        429 => ApiError::ProviderRateLimit(format!("Rate limit exceeded: {}", detail)),
        404 => ApiError::ProviderModelNotFound(format!("Model not found: {}", detail)),
        _ => ApiError::ProviderRequestFailed(format!(
            "Request failed with status {}: {}",
            status, detail
        )),
    }
}

/// Turn a non-success response into an `ApiError`, keeping the body as detail.
async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(status_error(status.as_u16(), error_text))
}

const PROVIDER_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const PROVIDER_HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

fn build_provider_http_client() -> Result<Client, ApiError> {
    Client::builder()
        .connect_timeout(PROVIDER_HTTP_CONNECT_TIMEOUT)
        .timeout(PROVIDER_HTTP_REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ApiError::ProviderError(format!("Failed to create HTTP client: {}", e)))
}

pub const GEMINI_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const OLLAMA_DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Google Gemini client (generateContent REST API)
pub struct GeminiClient {
    client: Client,
    model: String,
    api_key: String,
    base_url: String,
    options: CompletionOptions,
}

impl GeminiClient {
    pub fn new(
        model: String,
        api_key: String,
        base_url: Option<String>,
        options: CompletionOptions,
    ) -> Result<Self, ApiError> {
        let client = build_provider_http_client()?;
        let base_url = base_url.unwrap_or_else(|| GEMINI_DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client,
            model,
            api_key,
            base_url,
            options,
        })
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        trace!(%url, prompt_len = prompt.len(), "Sending Gemini request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest::new(prompt, &self.options))
            .send()
            .await
            .map_err(map_http_error)?;
        let response = ensure_success(response).await?;

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ApiError::ProviderError(format!("Failed to parse response: {}", e)))?;
        gemini_text(body)
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Client for any OpenAI-compatible chat-completions endpoint
///
/// Backs the OpenAI, Ollama and custom local provider types; they differ only in
/// base URL, optional bearer key and the name they report.
pub struct ChatCompletionsClient {
    client: Client,
    provider_name: &'static str,
    model: String,
    api_key: Option<String>,
    completions_url: String,
    options: CompletionOptions,
}

impl ChatCompletionsClient {
    pub fn openai(
        model: String,
        api_key: String,
        base_url: Option<String>,
        options: CompletionOptions,
    ) -> Result<Self, ApiError> {
        let base_url = base_url.unwrap_or_else(|| OPENAI_DEFAULT_BASE_URL.to_string());
        Self::build("openai", model, Some(api_key), &base_url, options)
    }

    pub fn ollama(
        model: String,
        base_url: Option<String>,
        options: CompletionOptions,
    ) -> Result<Self, ApiError> {
        let base_url = base_url.unwrap_or_else(|| OLLAMA_DEFAULT_BASE_URL.to_string());
        // Ollama serves the OpenAI-compatible API under /v1
        let base_url = format!("{}/v1", base_url.trim_end_matches('/'));
        Self::build("ollama", model, None, &base_url, options)
    }

    pub fn local(
        model: String,
        endpoint: String,
        api_key: Option<String>,
        options: CompletionOptions,
    ) -> Result<Self, ApiError> {
        Self::build("local", model, api_key, &endpoint, options)
    }

    fn build(
        provider_name: &'static str,
        model: String,
        api_key: Option<String>,
        base_url: &str,
        options: CompletionOptions,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            client: build_provider_http_client()?,
            provider_name,
            model,
            api_key,
            completions_url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            options,
        })
    }
}

#[async_trait]
impl ModelClient for ChatCompletionsClient {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        let request = ChatCompletionRequest::single_user_message(&self.model, prompt, &self.options);
        trace!(url = %self.completions_url, prompt_len = prompt.len(), "Sending chat completion request");

        let mut request_builder = self.client.post(&self.completions_url);
        if let Some(api_key) = &self.api_key {
            request_builder = request_builder.bearer_auth(api_key);
        }

        let response = request_builder
            .json(&request)
            .send()
            .await
            .map_err(map_http_error)?;
        let response = ensure_success(response).await?;

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ApiError::ProviderError(format!("Failed to parse response: {}", e)))?;
        first_choice_text(completion)
    }

    fn provider_name(&self) -> &str {
        self.provider_name
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Provider factory for creating provider clients
pub struct ProviderFactory;

impl ProviderFactory {
    pub fn create_client(
        provider: &ModelProvider,
        options: CompletionOptions,
    ) -> Result<Box<dyn ModelClient>, ApiError> {
        match provider {
            ModelProvider::Gemini {
                model,
                api_key,
                base_url,
            } => Ok(Box::new(GeminiClient::new(
                model.clone(),
                api_key.clone(),
                base_url.clone(),
                options,
            )?)),
            ModelProvider::OpenAI {
                model,
                api_key,
                base_url,
            } => Ok(Box::new(ChatCompletionsClient::openai(
                model.clone(),
                api_key.clone(),
                base_url.clone(),
                options,
            )?)),
            ModelProvider::Ollama { model, base_url } => Ok(Box::new(
                ChatCompletionsClient::ollama(model.clone(), base_url.clone(), options)?,
            )),
            ModelProvider::LocalCustom {
                model,
                endpoint,
                api_key,
            } => Ok(Box::new(ChatCompletionsClient::local(
                model.clone(),
                endpoint.clone(),
                api_key.clone(),
                options,
            )?)),
        }
    }

    /// Resolve credentials for `config` and build its client.
    pub fn from_config(config: &ProviderConfig) -> Result<Box<dyn ModelClient>, ApiError> {
        let provider = config.to_model_provider()?;
        Self::create_client(&provider, config.default_options.clone())
    }
}

// Mock client for testing
#[cfg(test)]
pub struct MockClient {
    responses: Vec<Result<String, String>>,
    current: std::sync::Arc<std::sync::Mutex<usize>>,
}

#[cfg(test)]
impl MockClient {
    pub fn new(responses: Vec<Result<String, String>>) -> Self {
        Self {
            responses,
            current: std::sync::Arc::new(std::sync::Mutex::new(0)),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl ModelClient for MockClient {
    async fn generate(&self, _prompt: &str) -> Result<String, ApiError> {
        let mut idx = self.current.lock().unwrap();
        let response = self
            .responses
            .get(*idx)
            .cloned()
            .unwrap_or_else(|| Ok("Mock response".to_string()));
        *idx += 1;
        response.map_err(ApiError::ProviderRequestFailed)
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
