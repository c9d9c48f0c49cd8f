//! Skyinsight: Generative Insights for Astronomical Objects
//!
//! Builds prompts for a named astronomical object, dispatches a narrative request
//! and a reference request concurrently to a generative-language model, and
//! assembles the results. Narrative failures fail the request. Reference failures
//! fall back to labeled placeholder references.

pub mod cli;
pub mod config;
pub mod error;
pub mod insight;
pub mod logging;
pub mod provider;
