//! Per-step execution trace

use serde::Serialize;

/// Machine state observed just before an instruction is dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraceStep {
    /// Program counter
    pub pc: usize,
    /// Raw opcode byte
    pub opcode: u8,
    /// Stack depth before the instruction
    pub stack_depth: usize,
    /// Memory size in bytes before the instruction
    pub memory_size: usize,
}
