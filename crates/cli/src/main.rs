// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! lf - Leadflow plan tooling

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{simulate, validate};
use lf_core::RuntimeConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lf", version, about = "Leadflow - validate and simulate lead plans")]
struct Cli {
    /// Runtime configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a plan definition
    Validate(validate::ValidateArgs),
    /// Run a plan against scripted tools
    Simulate(simulate::SimulateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    };

    match cli.command {
        Commands::Validate(args) => validate::validate(args),
        Commands::Simulate(args) => simulate::simulate(args, &config).await,
    }
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
