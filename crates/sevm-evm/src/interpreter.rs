//! EVM bytecode interpreter

use crate::arith::{self, u256_from_bool, u256_to_usize};
use crate::config::InterpreterConfig;
use crate::context::Environment;
use crate::error::{EvmError, EvmResult, ExecutionOutcome, HaltReason, Log};
use crate::memory::Memory;
use crate::opcode::Opcode;
use crate::stack::Stack;
use crate::trace::TraceStep;
use bytes::Bytes;
use sevm_crypto::keccak256_word;
use sevm_primitives::{H256, U256};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, trace};

/// Runs frames under a fixed configuration
#[derive(Clone, Debug, Default)]
pub struct Interpreter {
    config: InterpreterConfig,
}

impl Interpreter {
    /// Create an interpreter with the given configuration
    pub fn new(config: InterpreterConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Execute `code` against `calldata` until it halts
    pub fn execute(
        &self,
        code: impl Into<Bytes>,
        calldata: impl Into<Bytes>,
        env: &Environment,
    ) -> ExecutionOutcome {
        ExecutionContext::with_config(code, calldata, env.clone(), self.config.clone()).run()
    }
}

/// State of a single call frame
#[derive(Clone, Debug)]
pub struct ExecutionContext {
    /// Bytecode being executed
    code: Bytes,
    /// Input data
    calldata: Bytes,
    /// Environment snapshot
    env: Environment,
    config: InterpreterConfig,
    /// Program counter
    pc: usize,
    stack: Stack,
    memory: Memory,
    /// Output of RETURN or REVERT
    return_data: Vec<u8>,
    status: HaltReason,
    fault: Option<EvmError>,
    /// Valid jump destinations
    jump_dests: HashSet<usize>,
    storage: BTreeMap<U256, U256>,
    transient: HashMap<U256, U256>,
    logs: Vec<Log>,
    steps: u64,
    trace: Option<Vec<TraceStep>>,
}

impl ExecutionContext {
    /// Create a context with the default configuration
    pub fn new(code: impl Into<Bytes>, calldata: impl Into<Bytes>, env: Environment) -> Self {
        Self::with_config(code, calldata, env, InterpreterConfig::default())
    }

    /// Create a context with an explicit configuration
    pub fn with_config(
        code: impl Into<Bytes>,
        calldata: impl Into<Bytes>,
        env: Environment,
        config: InterpreterConfig,
    ) -> Self {
        let code = code.into();
        let jump_dests = Self::analyze_jump_dests(&code);
        let trace = config.record_trace.then(Vec::new);
        Self {
            code,
            calldata: calldata.into(),
            env,
            pc: 0,
            stack: Stack::new(),
            memory: Memory::with_limit(config.memory_limit),
            return_data: Vec::new(),
            status: HaltReason::Running,
            fault: None,
            jump_dests,
            storage: BTreeMap::new(),
            transient: HashMap::new(),
            logs: Vec::new(),
            steps: 0,
            trace,
            config,
        }
    }

    /// Analyze bytecode for valid jump destinations
    fn analyze_jump_dests(code: &[u8]) -> HashSet<usize> {
        let mut dests = HashSet::new();
        let mut i = 0;

        while i < code.len() {
            let opcode = code[i];
            if opcode == Opcode::JUMPDEST as u8 {
                dests.insert(i);
            }
            // Skip PUSH operands
            if (0x60..=0x7F).contains(&opcode) {
                i += (opcode - 0x5F) as usize;
            }
            i += 1;
        }

        dests
    }

    /// Program counter
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Operand stack
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Linear memory
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Current halt status
    pub fn status(&self) -> HaltReason {
        self.status
    }

    /// Fault that ended the frame, if any
    pub fn fault(&self) -> Option<&EvmError> {
        self.fault.as_ref()
    }

    /// Instructions dispatched so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Whether `pc` is a valid jump target
    pub fn is_jump_dest(&self, pc: usize) -> bool {
        self.jump_dests.contains(&pc)
    }

    /// Execute until the frame halts
    pub fn run(mut self) -> ExecutionOutcome {
        while !self.status.is_terminal() {
            self.step();
        }
        self.into_outcome()
    }

    /// Dispatch a single instruction. A halted frame is left unchanged.
    pub fn step(&mut self) -> HaltReason {
        if self.status.is_terminal() {
            return self.status;
        }
        if let Err(fault) = self.dispatch() {
            self.fail(fault);
        }
        self.status
    }

    /// Package the frame's observable state
    pub fn into_outcome(self) -> ExecutionOutcome {
        let keep_effects = self.status.is_success();
        ExecutionOutcome {
            halt: self.status,
            fault: self.fault,
            stack: self.stack.into_vec(),
            memory: self.memory.into_inner(),
            return_data: self.return_data,
            storage: if keep_effects { self.storage } else { BTreeMap::new() },
            logs: if keep_effects { self.logs } else { Vec::new() },
            steps: self.steps,
            trace: self.trace,
        }
    }

    fn dispatch(&mut self) -> EvmResult<()> {
        let Some(&byte) = self.code.get(self.pc) else {
            // Running off the end of the code is an implicit STOP
            self.halt(HaltReason::Stopped);
            return Ok(());
        };

        if let Some(limit) = self.config.step_limit {
            if self.steps >= limit {
                return Err(EvmError::StepLimitExceeded(limit));
            }
        }

        if let Some(trace) = self.trace.as_mut() {
            trace.push(TraceStep {
                pc: self.pc,
                opcode: byte,
                stack_depth: self.stack.len(),
                memory_size: self.memory.size(),
            });
        }
        self.steps += 1;
        trace!(pc = self.pc, opcode = byte, depth = self.stack.len(), "step");

        let opcode = Opcode::from_byte(byte).ok_or(EvmError::InvalidOpcode(byte))?;
        self.execute(opcode)
    }

    fn halt(&mut self, reason: HaltReason) {
        self.status = reason;
        debug!(halt = %reason, pc = self.pc, steps = self.steps, "frame halted");
    }

    fn fail(&mut self, fault: EvmError) {
        debug!(%fault, pc = self.pc, steps = self.steps, "frame faulted");
        self.return_data.clear();
        self.fault = Some(fault);
        self.status = HaltReason::Invalid;
    }

    /// Execute an opcode
    fn execute(&mut self, opcode: Opcode) -> EvmResult<()> {
        match opcode {
            // Stop
            Opcode::STOP => {
                self.halt(HaltReason::Stopped);
                return Ok(());
            }

            // Arithmetic
            Opcode::ADD => self.binary(arith::u256_add)?,
            Opcode::MUL => self.binary(arith::u256_mul)?,
            Opcode::SUB => self.binary(arith::u256_sub)?,
            Opcode::DIV => self.binary(arith::u256_div)?,
            Opcode::SDIV => self.binary(arith::u256_sdiv)?,
            Opcode::MOD => self.binary(arith::u256_mod)?,
            Opcode::SMOD => self.binary(arith::u256_smod)?,
            Opcode::ADDMOD => self.ternary(arith::u256_addmod)?,
            Opcode::MULMOD => self.ternary(arith::u256_mulmod)?,
            Opcode::EXP => self.binary(arith::u256_exp)?,
            Opcode::SIGNEXTEND => self.binary(arith::u256_signextend)?,

            // Comparison
            Opcode::LT => self.compare(|a, b| a < b)?,
            Opcode::GT => self.compare(|a, b| a > b)?,
            Opcode::SLT => self.compare(arith::u256_slt)?,
            Opcode::SGT => self.compare(arith::u256_sgt)?,
            Opcode::EQ => self.compare(|a, b| a == b)?,
            Opcode::ISZERO => {
                let a = self.stack.pop()?;
                self.stack.push(u256_from_bool(a.is_zero()))?;
            }

            // Bitwise
            Opcode::AND => self.binary(|a, b| *a & *b)?,
            Opcode::OR => self.binary(|a, b| *a | *b)?,
            Opcode::XOR => self.binary(|a, b| *a ^ *b)?,
            Opcode::NOT => {
                let a = self.stack.pop()?;
                self.stack.push(!a)?;
            }
            Opcode::BYTE => self.binary(arith::u256_byte)?,
            Opcode::SHL => self.binary(arith::u256_shl)?,
            Opcode::SHR => self.binary(arith::u256_shr)?,
            Opcode::SAR => self.binary(arith::u256_sar)?,

            // SHA3
            Opcode::SHA3 => {
                let data = match self.pop_region()? {
                    Some((offset, size)) => self.memory.load(offset, size)?,
                    None => Vec::new(),
                };
                self.stack.push(keccak256_word(&data))?;
            }

            // Environment
            Opcode::ADDRESS => self.stack.push(self.env.call.address.to_word())?,
            Opcode::ORIGIN => self.stack.push(self.env.tx.origin.to_word())?,
            Opcode::CALLER => self.stack.push(self.env.call.caller.to_word())?,
            Opcode::CALLVALUE => self.stack.push(self.env.call.value)?,
            Opcode::CALLDATALOAD => {
                let offset = self.stack.pop()?;
                let word = read_padded(&self.calldata, &offset, 32);
                self.stack.push(U256::from_big_endian(&word))?;
            }
            Opcode::CALLDATASIZE => self.stack.push(U256::from(self.calldata.len()))?,
            Opcode::CALLDATACOPY => {
                let [dest, offset, size] = self.stack.pop_n()?;
                self.copy_to_memory(Source::Calldata, &dest, &offset, &size)?;
            }
            Opcode::CODESIZE => self.stack.push(U256::from(self.code.len()))?,
            Opcode::CODECOPY => {
                let [dest, offset, size] = self.stack.pop_n()?;
                self.copy_to_memory(Source::Code, &dest, &offset, &size)?;
            }
            Opcode::GASPRICE => self.stack.push(self.env.tx.gas_price)?,
            Opcode::RETURNDATASIZE => {
                // No sub-calls happen inside a single frame
                self.stack.push(U256::zero())?;
            }
            Opcode::RETURNDATACOPY => {
                let [_dest, offset, size] = self.stack.pop_n()?;
                if !offset.is_zero() || !size.is_zero() {
                    return Err(EvmError::ReturnDataOutOfBounds);
                }
            }
            Opcode::EXTCODECOPY => {
                let [_address, dest, _offset, size] = self.stack.pop_n()?;
                self.copy_to_memory(Source::Empty, &dest, &U256::zero(), &size)?;
            }

            // Account state is not visible to a single frame
            Opcode::BALANCE | Opcode::EXTCODESIZE | Opcode::EXTCODEHASH | Opcode::BLOCKHASH => {
                self.stack.pop()?;
                self.stack.push(U256::zero())?;
            }
            Opcode::SELFBALANCE => self.stack.push(U256::zero())?,

            // Block info
            Opcode::COINBASE => self.stack.push(self.env.block.coinbase.to_word())?,
            Opcode::TIMESTAMP => self.stack.push(U256::from(self.env.block.timestamp))?,
            Opcode::NUMBER => self.stack.push(U256::from(self.env.block.number))?,
            Opcode::PREVRANDAO => self.stack.push(self.env.block.prevrandao.to_word())?,
            Opcode::GASLIMIT => self.stack.push(U256::from(self.env.block.gas_limit))?,
            Opcode::CHAINID => self.stack.push(U256::from(self.env.block.chain_id))?,
            Opcode::BASEFEE => self.stack.push(self.env.block.base_fee)?,

            // Stack, Memory, Storage
            Opcode::POP => {
                self.stack.pop()?;
            }
            Opcode::MLOAD => {
                let offset = self.pop_offset()?;
                let value = self.memory.load_word(offset)?;
                self.stack.push(value)?;
            }
            Opcode::MSTORE => {
                let [offset, value] = self.stack.pop_n()?;
                let offset = u256_to_usize(&offset).ok_or(EvmError::MemoryOutOfBounds)?;
                self.memory.store_word(offset, &value)?;
            }
            Opcode::MSTORE8 => {
                let [offset, value] = self.stack.pop_n()?;
                let offset = u256_to_usize(&offset).ok_or(EvmError::MemoryOutOfBounds)?;
                self.memory.store_byte(offset, value.byte(0))?;
            }
            Opcode::MSIZE => self.stack.push(U256::from(self.memory.size()))?,
            Opcode::MCOPY => {
                let [dest, src, size] = self.stack.pop_n()?;
                if !size.is_zero() {
                    let to_usize = |v: &U256| u256_to_usize(v).ok_or(EvmError::MemoryOutOfBounds);
                    self.memory.copy(to_usize(&dest)?, to_usize(&src)?, to_usize(&size)?)?;
                }
            }
            Opcode::SLOAD => {
                let key = self.stack.pop()?;
                let value = self.storage.get(&key).copied().unwrap_or_default();
                self.stack.push(value)?;
            }
            Opcode::SSTORE => {
                let [key, value] = self.stack.pop_n()?;
                self.storage.insert(key, value);
            }
            Opcode::TLOAD => {
                let key = self.stack.pop()?;
                let value = self.transient.get(&key).copied().unwrap_or_default();
                self.stack.push(value)?;
            }
            Opcode::TSTORE => {
                let [key, value] = self.stack.pop_n()?;
                self.transient.insert(key, value);
            }

            // Flow
            Opcode::JUMP => {
                let dest = self.stack.pop()?;
                return self.jump(dest);
            }
            Opcode::JUMPI => {
                let [dest, cond] = self.stack.pop_n()?;
                if !cond.is_zero() {
                    return self.jump(dest);
                }
            }
            Opcode::PC => self.stack.push(U256::from(self.pc))?,
            Opcode::GAS => self.stack.push(U256::from(self.env.call.gas))?,
            Opcode::JUMPDEST => {}

            // Push operations
            Opcode::PUSH0 => self.stack.push(U256::zero())?,
            op if op.push_size() > 0 => {
                let size = op.push_size();
                let mut immediate = [0u8; 32];
                let start = self.pc + 1;
                let end = (start + size).min(self.code.len());
                if start < end {
                    // Truncated immediates are zero-filled on the low-order side
                    immediate[32 - size..32 - size + (end - start)]
                        .copy_from_slice(&self.code[start..end]);
                }
                self.stack.push(U256::from_big_endian(&immediate))?;
                self.pc += 1 + size;
                return Ok(());
            }

            // Dup and swap operations
            op if op.dup_depth() > 0 => self.stack.dup(op.dup_depth())?,
            op if op.swap_depth() > 0 => self.stack.swap(op.swap_depth())?,

            // LOG operations
            op if op.log_topics().is_some() => {
                let topic_count = op.log_topics().unwrap_or_default();
                if self.stack.len() < 2 + topic_count {
                    return Err(EvmError::StackUnderflow);
                }
                let region = self.pop_region()?;
                let mut topics = Vec::with_capacity(topic_count);
                for _ in 0..topic_count {
                    topics.push(H256::from_word(&self.stack.pop()?));
                }
                let data = match region {
                    Some((offset, size)) => self.memory.load(offset, size)?,
                    None => Vec::new(),
                };
                self.logs.push(Log {
                    address: self.env.call.address,
                    topics,
                    data,
                });
            }

            // Return/Revert
            Opcode::RETURN | Opcode::REVERT => {
                let output = match self.pop_region()? {
                    Some((offset, size)) => self.memory.load(offset, size)?,
                    None => Vec::new(),
                };
                self.return_data = output;
                let reason = if opcode == Opcode::RETURN {
                    HaltReason::Returned
                } else {
                    HaltReason::Reverted
                };
                self.halt(reason);
                return Ok(());
            }
            Opcode::INVALID => {
                return Err(EvmError::InvalidOpcode(opcode.as_byte()));
            }

            op if op.needs_host() => {
                return Err(EvmError::UnsupportedOpcode(op.as_byte()));
            }

            // PUSH/DUP/SWAP/LOG ranges are fully covered by the guards above
            _ => {
                return Err(EvmError::InvalidOpcode(opcode.as_byte()));
            }
        }

        self.pc += 1;
        Ok(())
    }

    fn binary(&mut self, op: fn(&U256, &U256) -> U256) -> EvmResult<()> {
        let [a, b] = self.stack.pop_n()?;
        self.stack.push(op(&a, &b))
    }

    fn ternary(&mut self, op: fn(&U256, &U256, &U256) -> U256) -> EvmResult<()> {
        let [a, b, c] = self.stack.pop_n()?;
        self.stack.push(op(&a, &b, &c))
    }

    fn compare(&mut self, op: fn(&U256, &U256) -> bool) -> EvmResult<()> {
        let [a, b] = self.stack.pop_n()?;
        self.stack.push(u256_from_bool(op(&a, &b)))
    }

    fn pop_offset(&mut self) -> EvmResult<usize> {
        let offset = self.stack.pop()?;
        u256_to_usize(&offset).ok_or(EvmError::MemoryOutOfBounds)
    }

    /// Pop (offset, size), top first
    fn pop_region(&mut self) -> EvmResult<Option<(usize, usize)>> {
        let [offset, size] = self.stack.pop_n()?;
        Memory::region(&offset, &size)
    }

    fn jump(&mut self, dest: U256) -> EvmResult<()> {
        match u256_to_usize(&dest) {
            Some(target) if self.jump_dests.contains(&target) => {
                self.pc = target;
                Ok(())
            }
            _ => Err(EvmError::InvalidJumpDestination(dest)),
        }
    }

    fn copy_to_memory(
        &mut self,
        source: Source,
        dest: &U256,
        offset: &U256,
        size: &U256,
    ) -> EvmResult<()> {
        let Some((dest, size)) = Memory::region(dest, size)? else {
            return Ok(());
        };
        // Bound the allocation by the memory ceiling before reading
        self.memory.expand(dest, size)?;
        let data = match source {
            Source::Calldata => read_padded(&self.calldata, offset, size),
            Source::Code => read_padded(&self.code, offset, size),
            Source::Empty => vec![0u8; size],
        };
        self.memory.store(dest, &data)
    }
}

/// Where a *COPY opcode reads from
#[derive(Clone, Copy, Debug)]
enum Source {
    Calldata,
    Code,
    Empty,
}

/// `size` bytes of `source` starting at `offset`, zero-padded past the end
fn read_padded(source: &[u8], offset: &U256, size: usize) -> Vec<u8> {
    let mut out = vec![0u8; size];
    if let Some(start) = u256_to_usize(offset) {
        if start < source.len() {
            let end = start.saturating_add(size).min(source.len());
            out[..end - start].copy_from_slice(&source[start..end]);
        }
    }
    out
}
