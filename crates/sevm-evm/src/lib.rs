//! # sevm-evm
//!
//! Deterministic single-frame EVM bytecode interpreter.
//!
//! This crate provides:
//! - 256-bit word arithmetic with EVM wrap-around semantics
//! - Bounded operand stack and word-aligned linear memory
//! - Opcode table and jump destination analysis
//! - Execution environment resolution
//! - A step-wise interpreter producing an [`ExecutionOutcome`]
//!
//! Gas is not metered. The `GAS` opcode reports the call's gas budget and
//! opcodes that need a host (calls, creates, self-destruct) halt the frame
//! as invalid.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arith;
mod config;
mod context;
mod error;
mod interpreter;
mod memory;
mod opcode;
mod stack;
mod trace;

pub use config::InterpreterConfig;
pub use context::{
    AccountId, AccountRegistry, BlockContext, CallContext, CallIdentity, ContextError,
    Environment, EnvironmentConfig, StaticRegistry, TxContext, DEFAULT_CHAIN_ID,
    DEFAULT_GAS_LIMIT,
};
pub use error::{EvmError, EvmResult, ExecutionOutcome, HaltReason, Log};
pub use interpreter::{ExecutionContext, Interpreter};
pub use memory::{Memory, DEFAULT_MEMORY_LIMIT, WORD_SIZE};
pub use opcode::Opcode;
pub use stack::{Stack, MAX_STACK_SIZE};
pub use trace::TraceStep;

pub use sevm_primitives::{Address, H256, U256};
