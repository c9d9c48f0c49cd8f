//! Error types for the insight pipeline.

use thiserror::Error;

/// Errors raised by model providers and the ambient stack (config, logging, I/O).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("Provider request failed: {0}")]
    ProviderRequestFailed(String),

    #[error("Provider authentication failed: {0}")]
    ProviderAuthFailed(String),

    #[error("Provider rate limit exceeded: {0}")]
    ProviderRateLimit(String),

    #[error("Provider model not found: {0}")]
    ProviderModelNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Caller-visible failures of an orchestration.
///
/// The display text is fixed and safe to show to a user; the provider failure
/// that caused it is kept as the error source.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("Failed to generate insights. Please try again.")]
    GenerationFailed(#[source] ApiError),

    #[error("Failed to summarize data. Please try again.")]
    SummaryFailed(#[source] ApiError),
}

impl InsightError {
    /// The provider failure behind this error.
    pub fn provider_error(&self) -> &ApiError {
        match self {
            InsightError::GenerationFailed(source) | InsightError::SummaryFailed(source) => source,
        }
    }
}
