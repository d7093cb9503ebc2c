//! `sevm fixtures`

use crate::cli::FixturesArgs;
use crate::config::load_interpreter_config;
use anyhow::{Context, Result};
use sevm_evm_tests::{TestRunner, TestStats};

/// Run fixtures and print a summary
pub fn run(args: &FixturesArgs) -> Result<TestStats> {
    let config = load_interpreter_config(&args.interpreter)?;
    let stats = TestRunner::new(config, args.verbose)
        .run_path(&args.path)
        .with_context(|| format!("failed to run fixtures at {}", args.path.display()))?;
    stats.print_summary();
    Ok(stats)
}
