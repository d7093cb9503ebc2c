//! Fixture runner

use crate::error::{TestError, TestResult};
use crate::types::*;
use sevm_evm::{Environment, ExecutionOutcome, Interpreter, InterpreterConfig};
use std::path::Path;

/// Runs fixture cases against the interpreter
pub struct FixtureRunner {
    interpreter: Interpreter,
    /// Verbose output
    verbose: bool,
}

impl FixtureRunner {
    /// Create new fixture runner
    pub fn new(config: InterpreterConfig, verbose: bool) -> Self {
        Self {
            interpreter: Interpreter::new(config),
            verbose,
        }
    }

    /// Run all cases in a file
    pub fn run_file(&self, path: &Path) -> TestResult<FixtureResults> {
        let content = std::fs::read_to_string(path)?;
        self.run_source(&path.to_string_lossy(), &content)
    }

    /// Run all cases in a JSON document
    pub fn run_source(&self, file: &str, content: &str) -> TestResult<FixtureResults> {
        let cases: FixtureFile = serde_json::from_str(content)?;
        let mut results = FixtureResults::new(file.to_string());

        for (name, case) in cases {
            if let Some(reason) = &case.skip {
                if self.verbose {
                    tracing::info!("SKIP: {} - {}", name, reason);
                }
                results.skipped.push((name, reason.clone()));
                continue;
            }

            match self.run_case(&name, &case) {
                Ok(()) => {
                    if self.verbose {
                        tracing::info!("PASS: {}", name);
                    }
                    results.passed.push(name);
                }
                Err(e) => {
                    tracing::warn!("FAIL: {} - {}", name, e);
                    results.failed.push((name, e.to_string()));
                }
            }
        }

        Ok(results)
    }

    /// Run a single case
    pub fn run_case(&self, name: &str, case: &FixtureCase) -> TestResult<()> {
        let env = match &case.env {
            Some(config) => config.to_environment()?,
            None => Environment::default(),
        };

        let outcome = self
            .interpreter
            .execute(case.code.0.clone(), case.calldata.0.clone(), &env);

        check_outcome(name, case, &outcome)
    }
}

/// Compare an outcome against a case's expectations
fn check_outcome(name: &str, case: &FixtureCase, outcome: &ExecutionOutcome) -> TestResult<()> {
    if let Some(expected) = case.halt {
        if !expected.matches(outcome.halt) {
            let fault = outcome
                .fault
                .as_ref()
                .map(|f| format!(" ({})", f))
                .unwrap_or_default();
            return Err(TestError::Assertion(format!(
                "{}: halt mismatch: expected {:?}, got {}{}",
                name, expected, outcome.halt, fault
            )));
        }
    }

    if outcome.stack != case.stack.0 {
        return Err(TestError::Assertion(format!(
            "{}: stack mismatch: expected [{}], got [{}]",
            name,
            join_words(&case.stack.0),
            join_words(&outcome.stack)
        )));
    }

    if outcome.memory != case.memory.0 {
        return Err(TestError::Assertion(format!(
            "{}: memory mismatch: expected 0x{}, got 0x{}",
            name,
            hex::encode(&case.memory.0),
            hex::encode(&outcome.memory)
        )));
    }

    if outcome.return_data != case.return_value.0 {
        return Err(TestError::Assertion(format!(
            "{}: return data mismatch: expected 0x{}, got 0x{}",
            name,
            hex::encode(&case.return_value.0),
            hex::encode(&outcome.return_data)
        )));
    }

    Ok(())
}

fn join_words(words: &[sevm_primitives::U256]) -> String {
    words
        .iter()
        .map(|w| w.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Fixture file results
#[derive(Debug)]
pub struct FixtureResults {
    /// File path
    pub file: String,
    /// Passed cases
    pub passed: Vec<String>,
    /// Failed cases (name, reason)
    pub failed: Vec<(String, String)>,
    /// Skipped cases (name, reason)
    pub skipped: Vec<(String, String)>,
}

impl FixtureResults {
    /// Create new results
    pub fn new(file: String) -> Self {
        Self {
            file,
            passed: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Total number of cases
    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len() + self.skipped.len()
    }

    /// Pass rate over executed cases, as percentage
    pub fn pass_rate(&self) -> f64 {
        let executed = self.passed.len() + self.failed.len();
        if executed == 0 {
            return 100.0;
        }
        (self.passed.len() as f64 / executed as f64) * 100.0
    }
}
