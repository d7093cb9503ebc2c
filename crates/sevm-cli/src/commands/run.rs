//! `sevm run`

use crate::cli::RunArgs;
use crate::config::{decode_hex, load_environment, load_interpreter_config};
use anyhow::{Context, Result};
use sevm_evm::{ExecutionOutcome, Interpreter};

/// Execute the given bytecode and return its outcome
pub fn execute(args: &RunArgs) -> Result<ExecutionOutcome> {
    let code = decode_hex("code", &args.code)?;
    let calldata = decode_hex("calldata", &args.calldata)?;
    let env = load_environment(args.env.as_deref())?;
    let config = load_interpreter_config(&args.interpreter)?.with_trace(args.trace);

    tracing::debug!(
        code_len = code.len(),
        calldata_len = calldata.len(),
        step_limit = ?config.step_limit,
        "executing"
    );

    let outcome = Interpreter::new(config).execute(code, calldata, &env);
    tracing::info!(halt = %outcome.halt, steps = outcome.steps, "execution finished");
    Ok(outcome)
}

/// Execute and print the outcome as JSON
pub fn run(args: &RunArgs) -> Result<()> {
    let outcome = execute(args)?;
    let json = serde_json::to_string_pretty(&outcome).context("failed to encode outcome")?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::InterpreterArgs;
    use sevm_evm::{EvmError, HaltReason, U256};

    fn args(code: &str) -> RunArgs {
        RunArgs {
            code: code.to_string(),
            calldata: String::new(),
            env: None,
            trace: false,
            interpreter: InterpreterArgs::default(),
        }
    }

    #[test]
    fn test_execute_add() {
        let outcome = execute(&args("6003600401")).unwrap();
        assert_eq!(outcome.halt, HaltReason::Stopped);
        assert_eq!(outcome.stack, vec![U256::from(7)]);
        assert!(outcome.trace.is_none());
    }

    #[test]
    fn test_execute_calldata_and_trace() {
        let mut args = args("0x60003560005260206000f3");
        args.calldata = "0x2a".to_string();
        args.trace = true;
        let outcome = execute(&args).unwrap();
        assert_eq!(outcome.halt, HaltReason::Returned);
        assert_eq!(outcome.return_data[0], 0x2a);
        assert_eq!(outcome.trace.map(|t| t.len()), Some(7));
    }

    #[test]
    fn test_execute_step_limit_override() {
        let mut args = args("5b600056");
        args.interpreter.step_limit = Some(3);
        let outcome = execute(&args).unwrap();
        assert_eq!(outcome.fault, Some(EvmError::StepLimitExceeded(3)));
    }

    #[test]
    fn test_execute_bad_hex() {
        assert!(execute(&args("zz")).is_err());
    }
}
