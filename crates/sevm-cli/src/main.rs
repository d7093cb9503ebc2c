//! # sevm
//!
//! Command-line interface for the sevm interpreter.
//!
//! ## Usage
//!
//! ```bash
//! # Execute bytecode and print the outcome as JSON
//! sevm run --code 6003600401
//! sevm run --code 0x60003560005260206000f3 --calldata 0x2a --trace
//! sevm run --code 4600 --env env.toml --config sevm.toml
//!
//! # Run conformance fixtures
//! sevm fixtures crates/sevm-evm-tests/fixtures
//! ```

mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for command output
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match &cli.command {
        Commands::Run(args) => {
            commands::run::run(args)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Fixtures(args) => {
            let stats = commands::fixtures::run(args)?;
            if stats.all_passed() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
