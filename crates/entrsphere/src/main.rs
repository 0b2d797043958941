// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! EntrSphere discovery router CLI.
//!
//! Runs discovery interviews, classifies answer sets into routes, and picks
//! the model tier for a conversation transcript.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod classify;
mod interview;
mod questions;
mod tier;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use entrsphere_config::EntrsphereConfig;
use entrsphere_core::EntrsphereError;

/// EntrSphere discovery router.
#[derive(Parser, Debug)]
#[command(name = "entrsphere", version, about, long_about = None)]
struct Cli {
    /// Explicit config file (skips the XDG lookup; env overrides still apply).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run an interactive discovery interview.
    Interview {
        /// Write the resolved session as JSON to this file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Resolve the route for a set of answers and print it as JSON.
    Classify {
        /// Answer as `question_id=option_id`; repeat for each question.
        #[arg(long = "answer", value_parser = parse_pair)]
        answers: Vec<(String, String)>,
    },
    /// Select the model tier for a transcript and print the decision as JSON.
    Tier {
        /// JSON array of `{"role": ..., "content": ...}` messages, or `-` for stdin.
        #[arg(long)]
        transcript: PathBuf,
        /// Accumulated signal as `CATEGORY=weight`, e.g. `C=2`.
        #[arg(long = "signal", value_parser = parse_pair)]
        signals: Vec<(String, String)>,
    },
    /// List the question catalog.
    Questions,
}

/// Parse `key=value` command-line pairs.
fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() && !value.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected `key=value`, got `{raw}`")),
    }
}

fn load_config(path: Option<&std::path::Path>) -> EntrsphereConfig {
    let loaded = match path {
        Some(path) => entrsphere_config::load_and_validate_path(path),
        None => entrsphere_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            entrsphere_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

/// Initializes the tracing subscriber on stderr so stdout stays machine-readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("entrsphere={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    init_tracing(&config.discovery.log_level);

    let result: Result<(), EntrsphereError> = match cli.command {
        Commands::Interview { output } => interview::run_interview(&config, output).await,
        Commands::Classify { answers } => classify::run_classify(&config, &answers),
        Commands::Tier {
            transcript,
            signals,
        } => tier::run_tier(&config, &transcript, &signals),
        Commands::Questions => questions::run_questions(&config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
