//! EVM operand stack

use crate::error::{EvmError, EvmResult};
use sevm_primitives::U256;

/// Maximum stack depth
pub const MAX_STACK_SIZE: usize = 1024;

/// EVM stack (max 1024 items, 256-bit each)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stack {
    data: Vec<U256>,
}

impl Stack {
    /// Create a new empty stack
    pub fn new() -> Self {
        Self {
            data: Vec::with_capacity(MAX_STACK_SIZE),
        }
    }

    /// Push a value onto the stack
    pub fn push(&mut self, value: U256) -> EvmResult<()> {
        if self.data.len() >= MAX_STACK_SIZE {
            return Err(EvmError::StackOverflow);
        }
        self.data.push(value);
        Ok(())
    }

    /// Pop a value from the stack
    pub fn pop(&mut self) -> EvmResult<U256> {
        self.data.pop().ok_or(EvmError::StackUnderflow)
    }

    /// Pop `N` values at once, top of stack first.
    ///
    /// Depth is checked before anything is removed, so an underflow leaves
    /// the stack untouched.
    pub fn pop_n<const N: usize>(&mut self) -> EvmResult<[U256; N]> {
        if self.data.len() < N {
            return Err(EvmError::StackUnderflow);
        }
        let split = self.data.len() - N;
        let mut values = [U256::zero(); N];
        for (slot, value) in values.iter_mut().zip(self.data.drain(split..).rev()) {
            *slot = value;
        }
        Ok(values)
    }

    /// Peek at the top of the stack
    pub fn peek(&self) -> EvmResult<&U256> {
        self.data.last().ok_or(EvmError::StackUnderflow)
    }

    /// Peek at a specific depth (0 = top)
    pub fn peek_at(&self, depth: usize) -> EvmResult<&U256> {
        if depth >= self.data.len() {
            return Err(EvmError::StackUnderflow);
        }
        Ok(&self.data[self.data.len() - 1 - depth])
    }

    /// Swap top with item at depth (1 = swap with second item)
    pub fn swap(&mut self, depth: usize) -> EvmResult<()> {
        if depth == 0 || depth >= self.data.len() {
            return Err(EvmError::StackUnderflow);
        }
        let len = self.data.len();
        self.data.swap(len - 1, len - 1 - depth);
        Ok(())
    }

    /// Duplicate item at depth to top (1 = dup top)
    pub fn dup(&mut self, depth: usize) -> EvmResult<()> {
        if depth == 0 || depth > self.data.len() {
            return Err(EvmError::StackUnderflow);
        }
        if self.data.len() >= MAX_STACK_SIZE {
            return Err(EvmError::StackOverflow);
        }
        let value = self.data[self.data.len() - depth];
        self.data.push(value);
        Ok(())
    }

    /// Get current stack size
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if stack is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Values from bottom to top
    pub fn as_slice(&self) -> &[U256] {
        &self.data
    }

    /// Consume the stack, returning values bottom to top
    pub fn into_vec(self) -> Vec<U256> {
        self.data
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
