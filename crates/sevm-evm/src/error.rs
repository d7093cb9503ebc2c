//! EVM error and outcome types

use crate::trace::TraceStep;
use sevm_primitives::{Address, H256, U256};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Faults that terminate a frame
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvmError {
    /// Stack underflow
    #[error("stack underflow")]
    StackUnderflow,

    /// Stack overflow
    #[error("stack overflow (max 1024)")]
    StackOverflow,

    /// Jump target is not a JUMPDEST
    #[error("invalid jump destination: {0}")]
    InvalidJumpDestination(U256),

    /// Memory access beyond the configured ceiling
    #[error("memory access out of bounds")]
    MemoryOutOfBounds,

    /// Unassigned byte or the designated INVALID opcode
    #[error("invalid opcode: 0x{0:02x}")]
    InvalidOpcode(u8),

    /// Opcode that needs a collaborator outside a single frame
    #[error("unsupported opcode: 0x{0:02x}")]
    UnsupportedOpcode(u8),

    /// Return data out of bounds
    #[error("return data out of bounds")]
    ReturnDataOutOfBounds,

    /// Configured step limit reached
    #[error("step limit exceeded ({0} steps)")]
    StepLimitExceeded(u64),
}

/// Result type for EVM operations
pub type EvmResult<T> = Result<T, EvmError>;

/// Frame state; everything but `Running` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HaltReason {
    /// Still dispatching
    Running,
    /// STOP or end of code
    Stopped,
    /// RETURN
    Returned,
    /// REVERT
    Reverted,
    /// INVALID or any fault
    Invalid,
}

impl HaltReason {
    /// Whether execution has finished
    pub fn is_terminal(self) -> bool {
        !matches!(self, HaltReason::Running)
    }

    /// Whether side effects of the frame are kept
    pub fn is_success(self) -> bool {
        matches!(self, HaltReason::Stopped | HaltReason::Returned)
    }
}

impl std::fmt::Display for HaltReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HaltReason::Running => "running",
            HaltReason::Stopped => "stopped",
            HaltReason::Returned => "returned",
            HaltReason::Reverted => "reverted",
            HaltReason::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

/// Log entry emitted by LOG opcodes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Log {
    /// Contract address that emitted the log
    pub address: Address,
    /// Log topics (0-4)
    pub topics: Vec<H256>,
    /// Log data
    #[serde(serialize_with = "serialize_hex")]
    pub data: Vec<u8>,
}

/// Everything a caller can observe once a frame halts
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionOutcome {
    /// Final halt reason
    pub halt: HaltReason,
    /// Fault that caused an `Invalid` halt, if any
    #[serde(serialize_with = "serialize_fault")]
    pub fault: Option<EvmError>,
    /// Stack, bottom to top
    pub stack: Vec<U256>,
    /// Memory, full length
    #[serde(serialize_with = "serialize_hex")]
    pub memory: Vec<u8>,
    /// Data handed back by RETURN or REVERT
    #[serde(serialize_with = "serialize_hex")]
    pub return_data: Vec<u8>,
    /// Storage slots written by the frame
    pub storage: BTreeMap<U256, U256>,
    /// Logs emitted by the frame
    pub logs: Vec<Log>,
    /// Number of instructions dispatched
    pub steps: u64,
    /// Per-step trace, when recording is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<TraceStep>>,
}

impl ExecutionOutcome {
    /// Whether the frame ended in STOP or RETURN
    pub fn is_success(&self) -> bool {
        self.halt.is_success()
    }

    /// Return data as a `0x`-prefixed hex string
    pub fn return_data_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.return_data))
    }
}

fn serialize_hex<S: serde::Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
}

fn serialize_fault<S: serde::Serializer>(
    fault: &Option<EvmError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match fault {
        Some(err) => serializer.serialize_some(&err.to_string()),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(EvmError::StackUnderflow.to_string(), "stack underflow");
        assert_eq!(EvmError::StackOverflow.to_string(), "stack overflow (max 1024)");
        assert_eq!(EvmError::InvalidOpcode(0xfe).to_string(), "invalid opcode: 0xfe");
        assert_eq!(EvmError::UnsupportedOpcode(0xf1).to_string(), "unsupported opcode: 0xf1");
        assert_eq!(
            EvmError::InvalidJumpDestination(U256::from(10)).to_string(),
            "invalid jump destination: 10"
        );
        assert_eq!(
            EvmError::StepLimitExceeded(5).to_string(),
            "step limit exceeded (5 steps)"
        );
    }

    #[test]
    fn test_halt_reason_terminal() {
        assert!(!HaltReason::Running.is_terminal());
        assert!(HaltReason::Stopped.is_terminal());
        assert!(HaltReason::Returned.is_terminal());
        assert!(HaltReason::Reverted.is_terminal());
        assert!(HaltReason::Invalid.is_terminal());
    }

    #[test]
    fn test_halt_reason_success() {
        assert!(HaltReason::Stopped.is_success());
        assert!(HaltReason::Returned.is_success());
        assert!(!HaltReason::Reverted.is_success());
        assert!(!HaltReason::Invalid.is_success());
        assert!(!HaltReason::Running.is_success());
    }

    #[test]
    fn test_halt_reason_display() {
        assert_eq!(HaltReason::Returned.to_string(), "returned");
        assert_eq!(
            serde_json::to_string(&HaltReason::Reverted).unwrap(),
            "\"reverted\""
        );
    }

    #[test]
    fn test_outcome_serializes_hex() {
        let outcome = ExecutionOutcome {
            halt: HaltReason::Invalid,
            fault: Some(EvmError::StackUnderflow),
            stack: vec![U256::from(7)],
            memory: vec![0u8; 32],
            return_data: vec![0xbe, 0xef],
            storage: BTreeMap::new(),
            logs: Vec::new(),
            steps: 3,
            trace: None,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["halt"], "invalid");
        assert_eq!(json["fault"], "stack underflow");
        assert_eq!(json["return_data"], "0xbeef");
        assert_eq!(json["steps"], 3);
        assert!(json.get("trace").is_none());
        assert_eq!(outcome.return_data_hex(), "0xbeef");
    }
}
