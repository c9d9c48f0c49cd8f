//! Insight orchestration: two concurrent model calls with asymmetric failure handling.
//!
//! The narrative call is critical. If it fails, the whole operation fails. The
//! reference call is best-effort. If it fails, it is replaced by labeled fallback
//! data. Both calls are dispatched together and joined on the current task. Nothing
//! is spawned, and completion order does not matter.

use super::{
    build_prompt, build_summary_prompt, fallback_references, parse_narrative, parse_references,
    InsightResult, ObjectName, PromptKind, ReferenceList,
};
use crate::error::{ApiError, InsightError};
use crate::provider::ModelClient;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Coordinates prompt construction, dispatch and assembly for one client.
#[derive(Clone)]
pub struct InsightOrchestrator {
    client: Arc<dyn ModelClient>,
}

impl InsightOrchestrator {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &dyn ModelClient {
        self.client.as_ref()
    }

    /// Generate the narrative and references for `object_name`.
    ///
    /// Fails with [`InsightError::GenerationFailed`] only when the narrative call fails,
    /// whatever happened to the reference call. Reference failures resolve to
    /// [`fallback_references`].
    pub async fn get_insights(&self, object_name: &ObjectName) -> Result<InsightResult, InsightError> {
        let narrative_prompt = build_prompt(object_name.as_str(), PromptKind::Narrative);
        let references_prompt = build_prompt(object_name.as_str(), PromptKind::References);

        debug!(
            object = %object_name,
            provider = self.client.provider_name(),
            model = self.client.model_name(),
            "Dispatching narrative and reference generation"
        );

        let (narrative, references) = futures::join!(
            self.generate_narrative(object_name, &narrative_prompt),
            self.generate_references(object_name, &references_prompt),
        );

        let narrative = narrative.map_err(InsightError::GenerationFailed)?;
        Ok(InsightResult::new(narrative, references))
    }

    async fn generate_narrative(
        &self,
        object_name: &ObjectName,
        prompt: &str,
    ) -> Result<String, ApiError> {
        match self.client.generate(prompt).await {
            Ok(raw) => {
                debug!(object = %object_name, chars = raw.len(), "Narrative generated");
                Ok(parse_narrative(raw))
            }
            Err(err) => {
                error!(object = %object_name, error = %err, "Narrative generation failed");
                Err(err)
            }
        }
    }

    /// Never fails. Errors are swapped for fallback references.
    async fn generate_references(&self, object_name: &ObjectName, prompt: &str) -> ReferenceList {
        match self.client.generate(prompt).await {
            Ok(raw) => {
                let references = parse_references(&raw);
                debug!(object = %object_name, count = references.len(), "References generated");
                references
            }
            Err(err) => {
                warn!(
                    object = %object_name,
                    error = %err,
                    "Reference generation failed, using fallback references"
                );
                fallback_references(object_name)
            }
        }
    }

    /// Summarize observational data or a report. A single call with no fallback.
    pub async fn summarize_data(&self, input: &str) -> Result<String, InsightError> {
        let prompt = build_summary_prompt(input);
        debug!(input_chars = input.len(), "Dispatching data summary");

        self.client.generate(&prompt).await.map_err(|err| {
            error!(error = %err, "Data summary failed");
            InsightError::SummaryFailed(err)
        })
    }
}
