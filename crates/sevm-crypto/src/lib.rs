//! # sevm-crypto
//!
//! Keccak-256, the hash behind the `SHA3` opcode.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod hash;

pub use hash::{keccak256, keccak256_word};
