//! CLI domain: parse, route, output, and presentation only.
//! Orchestration lives in `insight`; the route table drives it through the lifecycle controller.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::{map_error, CliError};
pub use parse::{Cli, Commands, OutputFormat};
pub use presentation::{format_insight_json, format_insight_text, format_summary_text};
pub use route::RunContext;
