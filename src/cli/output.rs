//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, InsightError};
use thiserror::Error;

/// Failures surfaced by a CLI command
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Insight(#[from] InsightError),

    /// Terminal `Failed` state of an insight request, message already user-facing
    #[error("{0}")]
    RequestFailed(String),

    #[error("{0}")]
    InvalidInput(String),
}

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &CliError) -> String {
    match e {
        CliError::Api(ApiError::ProviderNotConfigured(msg)) => {
            format!("Provider not configured: {}", msg)
        }
        CliError::Api(ApiError::ConfigError(msg)) => format!("Configuration error: {}", msg),
        other => other.to_string(),
    }
}
