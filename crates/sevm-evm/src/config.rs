//! Interpreter configuration

use crate::memory::DEFAULT_MEMORY_LIMIT;
use serde::{Deserialize, Serialize};

/// Resource bounds and tracing switches for a frame
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct InterpreterConfig {
    /// Memory ceiling in bytes; memory grows in whole words, so the usable
    /// size is this value rounded down to a multiple of 32
    #[serde(default = "default_memory_limit")]
    pub memory_limit: usize,
    /// Maximum number of dispatched instructions (unbounded when absent)
    #[serde(default)]
    pub step_limit: Option<u64>,
    /// Record one trace entry per dispatched instruction
    #[serde(default)]
    pub record_trace: bool,
}

fn default_memory_limit() -> usize {
    DEFAULT_MEMORY_LIMIT
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            memory_limit: default_memory_limit(),
            step_limit: None,
            record_trace: false,
        }
    }
}

impl InterpreterConfig {
    /// Set the step limit
    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }

    /// Enable or disable trace recording
    pub fn with_trace(mut self, record: bool) -> Self {
        self.record_trace = record;
        self
    }

    /// Set the memory ceiling
    pub fn with_memory_limit(mut self, limit: usize) -> Self {
        self.memory_limit = limit;
        self
    }
}
