//! CLI argument parsing for sevm

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Deterministic single-frame EVM interpreter
#[derive(Parser, Debug)]
#[command(name = "sevm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Execute bytecode and print the outcome as JSON
    Run(RunArgs),
    /// Run a fixture file or directory of fixture files
    Fixtures(FixturesArgs),
}

/// Interpreter overrides shared by every command
#[derive(Debug, Args, Clone, Default)]
pub struct InterpreterArgs {
    /// Interpreter configuration file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Maximum number of dispatched instructions
    #[arg(long)]
    pub step_limit: Option<u64>,

    /// Memory ceiling in bytes
    #[arg(long)]
    pub memory_limit: Option<usize>,
}

/// Arguments for `sevm run`
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Bytecode as hex, with or without 0x
    #[arg(long)]
    pub code: String,

    /// Calldata as hex, with or without 0x
    #[arg(long, default_value = "")]
    pub calldata: String,

    /// Environment file (TOML)
    #[arg(long)]
    pub env: Option<PathBuf>,

    /// Record a per-step trace in the outcome
    #[arg(long)]
    pub trace: bool,

    #[command(flatten)]
    pub interpreter: InterpreterArgs,
}

/// Arguments for `sevm fixtures`
#[derive(Debug, Args)]
pub struct FixturesArgs {
    /// Fixture file or directory
    pub path: PathBuf,

    /// Log every case, not only failures
    #[arg(long, short)]
    pub verbose: bool,

    #[command(flatten)]
    pub interpreter: InterpreterArgs,
}
