//! Skyinsight CLI Binary
//!
//! Command-line caller for the insight pipeline.

use anyhow::Context;
use clap::Parser;
use skyinsight::cli::{map_error, Cli, CliError, RunContext};
use skyinsight::config::ConfigLoader;
use skyinsight::logging::{init_logging, LoggingConfig};
use std::io::IsTerminal;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Skyinsight CLI starting");

    let context = match RunContext::new(&cli.workspace, cli.config.as_ref()) {
        Ok(ctx) => {
            let color = !cli.no_color && ctx.config().logging.color && std::io::stdout().is_terminal();
            ctx.with_color(color)
        }
        Err(e) => {
            error!("Error loading configuration: {}", e);
            eprintln!("{}", map_error(&CliError::from(e)));
            process::exit(1);
        }
    };

    let result = build_runtime().map(|runtime| runtime.block_on(context.execute(&cli.command)));
    match result {
        Ok(Ok(output)) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Ok(Err(e)) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(1);
        }
    }
}

/// Single-threaded runtime: both model calls interleave on one thread.
fn build_runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

/// Build logging configuration from CLI args and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let loaded = match cli.config {
        Some(ref config_path) => ConfigLoader::load_from_file(config_path),
        None => ConfigLoader::load(&cli.workspace),
    };
    let mut config = loaded.map(|c| c.logging).unwrap_or_default();

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }
    if cli.no_color {
        config.color = false;
    }

    config
}
