//! Prompt templates for the insight and summary requests.

const NARRATIVE_TEMPLATE: &str = r#"As an expert astronomer, provide detailed insights about the astronomical object "{object_name}". Include:

**Physical Characteristics:**
Describe the object's key physical properties, composition, and structure.

**Research Findings:**
Summarize recent scientific discoveries and observations about this object.

**Observational History:**
Explain the historical significance and key observations from observatories.

**Scientific Significance:**
Discuss why this object is important for astronomical research.

Please provide accurate, scientifically sound information based on current astronomical knowledge."#;

const REFERENCES_TEMPLATE: &str = r#"Generate 4 realistic academic references for the astronomical object "{object_name}". Format each as:
Author, A. et al. (Year). 'Title about {object_name}' - Journal Name, Volume, Page

Put each reference on its own line with no numbering or extra commentary.
These references are illustrative only: make them sound realistic but clearly indicate they are AI-generated examples."#;

const SUMMARY_TEMPLATE: &str = r#"As an expert astronomical data analyst familiar with Mount Abu Observatory, analyze and summarize the following observational data or report:

{input}

Provide a comprehensive summary that includes:
• Key findings and observations
• Data patterns and trends
• Scientific significance
• Recommendations for further analysis

Focus on extracting the most important astronomical insights from this data."#;

/// Which request a prompt is for; also decides how the reply is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    Narrative,
    References,
}

/// Render the prompt of `kind` for `object_name`. Total and side-effect free.
pub fn build_prompt(object_name: &str, kind: PromptKind) -> String {
    let template = match kind {
        PromptKind::Narrative => NARRATIVE_TEMPLATE,
        PromptKind::References => REFERENCES_TEMPLATE,
    };
    template.replace("{object_name}", object_name)
}

/// Render the data-summary prompt around caller-supplied observational text.
pub fn build_summary_prompt(input: &str) -> String {
    SUMMARY_TEMPLATE.replace("{input}", input)
}
