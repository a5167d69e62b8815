// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! gasgauge - a capacity gauge for long assistant sessions.
//!
//! This is the binary entry point.

mod estimate;
mod metrics;
mod shell;
mod status;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use gasgauge_config::model::GaugeConfig;
use gasgauge_core::GaugeError;

/// gasgauge - track estimated session capacity and when to hop.
#[derive(Parser, Debug)]
#[command(name = "gasgauge", version, about, long_about = None)]
struct Cli {
    /// Load this config file (plus GASGAUGE_* env vars) instead of the usual hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colors.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch the interactive gauge shell.
    Shell,
    /// Estimate the cost of one operation without registering it.
    Estimate {
        /// Operation kind (context_load, code_generation, discussion, search,
        /// artifact_creation, planning, or a short alias).
        kind: String,
        /// low, medium or high.
        #[arg(long, short)]
        complexity: Option<String>,
        /// small, medium, large, or a number (KB, words, results).
        #[arg(long, short)]
        size: Option<String>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Pre-task assessment with decision options.
    Assess {
        /// Task name shown in the report.
        name: String,
        kind: String,
        #[arg(long, short)]
        complexity: Option<String>,
        #[arg(long, short)]
        size: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show persisted session history and learned thresholds.
    Metrics {
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => gasgauge_config::load_and_validate_path(path),
        None => gasgauge_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            gasgauge_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.gauge.log_level);
    let use_color = !cli.plain && std::io::stdout().is_terminal();

    if let Err(e) = run(cli.command, config, use_color) {
        if use_color {
            eprintln!("{}: {e}", "error".red());
        } else {
            eprintln!("error: {e}");
        }
        std::process::exit(if e.is_caller_error() { 2 } else { 1 });
    }
}

fn run(command: Option<Commands>, config: GaugeConfig, use_color: bool) -> Result<(), GaugeError> {
    match command {
        Some(Commands::Shell) => shell::run_shell(config, use_color),
        Some(Commands::Estimate {
            kind,
            complexity,
            size,
            json,
        }) => estimate::run_estimate(
            &config,
            &kind,
            complexity.as_deref(),
            size.as_deref(),
            json,
            use_color,
        ),
        Some(Commands::Assess {
            name,
            kind,
            complexity,
            size,
            json,
        }) => estimate::run_assess(
            &config,
            &name,
            &kind,
            complexity.as_deref(),
            size.as_deref(),
            json,
            use_color,
        ),
        Some(Commands::Metrics { json }) => metrics::run_metrics(&config, json),
        Some(Commands::Config) => {
            let rendered = gasgauge_config::to_toml_string(&config)
                .map_err(|e| GaugeError::Config(e.to_string()))?;
            print!("{rendered}");
            Ok(())
        }
        None => {
            println!("gasgauge: use --help for available commands");
            Ok(())
        }
    }
}

/// Install the stderr tracing subscriber; `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "gasgauge={log_level},gasgauge_cost={log_level},gasgauge_storage={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
