//! EVM memory implementation

use crate::arith::u256_to_usize;
use crate::error::{EvmError, EvmResult};
use sevm_primitives::U256;

/// Default ceiling on memory growth (32 MiB)
pub const DEFAULT_MEMORY_LIMIT: usize = 32 * 1024 * 1024;

/// Memory word size in bytes
pub const WORD_SIZE: usize = 32;

/// EVM memory (byte-addressable, expandable, never shrinks)
#[derive(Clone, Debug)]
pub struct Memory {
    data: Vec<u8>,
    limit: usize,
}

impl Memory {
    /// Create new empty memory with the default ceiling
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MEMORY_LIMIT)
    }

    /// Create new empty memory that may grow to at most `limit` bytes
    pub fn with_limit(limit: usize) -> Self {
        Self {
            data: Vec::new(),
            limit,
        }
    }

    /// Resolve a word-sized (offset, size) pair into a machine range.
    ///
    /// A zero size yields `None` whatever the offset, since such an access
    /// touches nothing.
    pub fn region(offset: &U256, size: &U256) -> EvmResult<Option<(usize, usize)>> {
        if size.is_zero() {
            return Ok(None);
        }
        let offset = u256_to_usize(offset).ok_or(EvmError::MemoryOutOfBounds)?;
        let size = u256_to_usize(size).ok_or(EvmError::MemoryOutOfBounds)?;
        Ok(Some((offset, size)))
    }

    /// Get current memory size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Ensure `offset..offset + size` is addressable, growing to the next
    /// word boundary if needed
    pub fn expand(&mut self, offset: usize, size: usize) -> EvmResult<()> {
        if size == 0 {
            return Ok(());
        }

        let end = offset.checked_add(size).ok_or(EvmError::MemoryOutOfBounds)?;
        if end <= self.data.len() {
            return Ok(());
        }

        // The ceiling bounds the word-aligned length, not the raw end
        let aligned = end
            .div_ceil(WORD_SIZE)
            .checked_mul(WORD_SIZE)
            .ok_or(EvmError::MemoryOutOfBounds)?;
        if aligned > self.limit {
            return Err(EvmError::MemoryOutOfBounds);
        }

        self.data.resize(aligned, 0);
        Ok(())
    }

    /// Load a 32-byte word from memory
    pub fn load_word(&mut self, offset: usize) -> EvmResult<U256> {
        self.expand(offset, WORD_SIZE)?;
        Ok(U256::from_big_endian(&self.data[offset..offset + WORD_SIZE]))
    }

    /// Store a 32-byte word to memory
    pub fn store_word(&mut self, offset: usize, value: &U256) -> EvmResult<()> {
        self.expand(offset, WORD_SIZE)?;
        value.to_big_endian(&mut self.data[offset..offset + WORD_SIZE]);
        Ok(())
    }

    /// Store a single byte to memory
    pub fn store_byte(&mut self, offset: usize, value: u8) -> EvmResult<()> {
        self.expand(offset, 1)?;
        self.data[offset] = value;
        Ok(())
    }

    /// Load a byte range from memory, expanding to cover it
    pub fn load(&mut self, offset: usize, size: usize) -> EvmResult<Vec<u8>> {
        if size == 0 {
            return Ok(Vec::new());
        }
        self.expand(offset, size)?;
        Ok(self.data[offset..offset + size].to_vec())
    }

    /// Store a byte slice to memory
    pub fn store(&mut self, offset: usize, data: &[u8]) -> EvmResult<()> {
        if data.is_empty() {
            return Ok(());
        }
        self.expand(offset, data.len())?;
        self.data[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Copy within memory (MCOPY); overlapping ranges behave like memmove
    pub fn copy(&mut self, dest: usize, src: usize, size: usize) -> EvmResult<()> {
        if size == 0 {
            return Ok(());
        }

        self.expand(src, size)?;
        self.expand(dest, size)?;
        self.data.copy_within(src..src + size, dest);
        Ok(())
    }

    /// Get raw data slice
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume memory, returning its bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
