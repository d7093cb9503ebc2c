//! Error types for fixture tests

use std::path::PathBuf;
use thiserror::Error;

/// Test error type
#[derive(Error, Debug)]
pub enum TestError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Fixture path does not exist
    #[error("fixture path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Fixture field could not be interpreted
    #[error("Parse error: {0}")]
    Parse(String),

    /// Assertion failed
    #[error("Assertion failed: {0}")]
    Assertion(String),
}

impl From<sevm_evm::ContextError> for TestError {
    fn from(e: sevm_evm::ContextError) -> Self {
        TestError::Parse(e.to_string())
    }
}

/// Test result type
pub type TestResult<T> = Result<T, TestError>;
