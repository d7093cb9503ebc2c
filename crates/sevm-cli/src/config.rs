//! Configuration file loading

use crate::cli::InterpreterArgs;
use anyhow::{Context, Result};
use sevm_evm::{Environment, EnvironmentConfig, InterpreterConfig};
use std::path::Path;

/// Load the interpreter configuration, then apply command-line overrides
pub fn load_interpreter_config(args: &InterpreterArgs) -> Result<InterpreterConfig> {
    let mut config = match &args.config {
        Some(path) => load_toml::<InterpreterConfig>(path)?,
        None => InterpreterConfig::default(),
    };

    if let Some(limit) = args.step_limit {
        config = config.with_step_limit(limit);
    }
    if let Some(limit) = args.memory_limit {
        config = config.with_memory_limit(limit);
    }

    Ok(config)
}

/// Load an environment file, or the default environment when none is given
pub fn load_environment(path: Option<&Path>) -> Result<Environment> {
    let Some(path) = path else {
        return Ok(Environment::default());
    };
    let config: EnvironmentConfig = load_toml(path)?;
    config
        .to_environment()
        .with_context(|| format!("invalid environment in {}", path.display()))
}

fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    tracing::info!("Loading configuration from {:?}", path);
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Decode a hex argument, with or without a `0x` prefix
pub fn decode_hex(field: &str, s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    hex::decode(digits).with_context(|| format!("invalid hex in --{}", field))
}
