//! Presentation: text and JSON renderings of command results.

use crate::error::ApiError;
use crate::insight::{InsightResult, ObjectName};
use owo_colors::OwoColorize;

fn heading(text: &str, color: bool) -> String {
    if color {
        text.bold().cyan().to_string()
    } else {
        text.to_string()
    }
}

pub fn format_loading_notice(object_name: &ObjectName) -> String {
    format!(
        "Gathering and analyzing research data about \"{}\". Please wait...",
        object_name
    )
}

pub fn format_insight_text(object_name: &ObjectName, result: &InsightResult, color: bool) -> String {
    let mut s = heading(&format!("Analysis: {}", object_name), color);
    s.push_str("\n\n");
    s.push_str(result.narrative().trim_end());

    let references = result.references();
    if !references.is_empty() {
        s.push_str("\n\n");
        s.push_str(&heading("Research References", color));
        if references.is_fallback() {
            s.push_str("\n  (reference generation failed; showing placeholder examples)");
        }
        for (index, reference) in references.iter().enumerate() {
            s.push_str(&format!("\n  {}. {}", index + 1, reference.trim()));
        }
    }
    s
}

pub fn format_insight_json(result: &InsightResult) -> Result<String, ApiError> {
    serde_json::to_string_pretty(result)
        .map_err(|e| ApiError::ConfigError(format!("Failed to serialize result: {}", e)))
}

pub fn format_summary_text(summary: &str, color: bool) -> String {
    format!("{}\n\n{}", heading("Data Summary", color), summary.trim_end())
}
