//! Integration tests for the insight pipeline

mod config_integration;
mod insight_orchestration;
mod test_utils;
