//! CLI route: single route table and run context. Dispatches to the insight domain and presentation.

use crate::cli::output::CliError;
use crate::cli::parse::{Commands, OutputFormat};
use crate::cli::presentation::{
    format_insight_json, format_insight_text, format_loading_notice, format_summary_text,
};
use crate::config::{ConfigLoader, InsightConfig};
use crate::error::ApiError;
use crate::insight::{InsightOrchestrator, LifecycleController, RequestState};
use crate::provider::{ModelClient, ProviderFactory};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Runtime context for CLI execution: loaded configuration and presentation settings.
/// The model client is built on demand so `config` works without credentials.
pub struct RunContext {
    config: InsightConfig,
    color: bool,
    lifecycle: LifecycleController,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: &Path, config_path: Option<&PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(workspace_root)?,
        };
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: InsightConfig) -> Self {
        let color = config.logging.color;
        Self {
            config,
            color,
            lifecycle: LifecycleController::new(),
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> &LifecycleController {
        &self.lifecycle
    }

    /// Validate the provider section and build its client.
    pub fn build_orchestrator(&self) -> Result<InsightOrchestrator, ApiError> {
        self.config
            .provider
            .validate()
            .map_err(ApiError::ProviderNotConfigured)?;
        let client: Arc<dyn ModelClient> = Arc::from(ProviderFactory::from_config(&self.config.provider)?);
        info!(
            provider = client.provider_name(),
            model = client.model_name(),
            "Model client ready"
        );
        Ok(InsightOrchestrator::new(client))
    }

    /// Execute a command, returning what should be printed to stdout.
    pub async fn execute(&self, command: &Commands) -> Result<String, CliError> {
        match command {
            Commands::Insights { object, format } => {
                let orchestrator = self.build_orchestrator()?;
                self.run_insights(&orchestrator, object, *format).await
            }
            Commands::Summarize { text, file } => {
                let input = read_summary_input(text.as_deref(), file.as_deref())?;
                let orchestrator = self.build_orchestrator()?;
                let summary = orchestrator.summarize_data(&input).await?;
                Ok(format_summary_text(&summary, self.color))
            }
            Commands::Config => toml::to_string_pretty(&self.config.redacted())
                .map_err(|e| CliError::Api(ApiError::ConfigError(e.to_string()))),
        }
    }

    /// Drive one insight request through the lifecycle and render its terminal state.
    pub async fn run_insights(
        &self,
        orchestrator: &InsightOrchestrator,
        object: &str,
        format: OutputFormat,
    ) -> Result<String, CliError> {
        let Some(ticket) = self.lifecycle.begin(object) else {
            debug!("Blank object name; nothing to do");
            return Ok("Enter the name of an astronomical object to analyze.".to_string());
        };
        eprintln!("{}", format_loading_notice(ticket.object_name()));

        let object_name = ticket.object_name().clone();
        let outcome = orchestrator.get_insights(&object_name).await;
        self.lifecycle.settle(ticket, outcome);

        match self.lifecycle.state() {
            RequestState::Success { result } => match format {
                OutputFormat::Text => Ok(format_insight_text(&object_name, &result, self.color)),
                OutputFormat::Json => Ok(format_insight_json(&result)?),
            },
            RequestState::Failed { message } => Err(CliError::RequestFailed(message)),
            RequestState::Idle | RequestState::Loading { .. } => Err(CliError::RequestFailed(
                "Insight request did not settle".to_string(),
            )),
        }
    }
}

/// Inline text or file contents; blank input is rejected before any model call.
fn read_summary_input(text: Option<&str>, file: Option<&Path>) -> Result<String, CliError> {
    let input = match (text, file) {
        (_, Some(path)) => std::fs::read_to_string(path).map_err(ApiError::Io)?,
        (Some(text), None) => text.to_string(),
        (None, None) => String::new(),
    };
    if input.trim().is_empty() {
        return Err(CliError::InvalidInput(
            "Nothing to summarize: provide text or --file".to_string(),
        ));
    }
    Ok(input)
}
