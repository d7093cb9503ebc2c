//! # sevm-primitives
//!
//! Primitive types shared by the sevm crates.
//!
//! Addresses and hashes are fixed-size byte arrays; machine words are
//! `primitive_types::U256`, re-exported here so downstream crates agree on
//! a single integer type.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod hash;
mod error;

pub use address::{Address, AddressError};
pub use hash::{HashError, H256};
pub use error::PrimitiveError;

// Re-export primitive-types for U256
pub use primitive_types::U256;

/// Parse a `U256` from a decimal string or a `0x`-prefixed hex string.
pub fn parse_u256(s: &str) -> Result<U256, PrimitiveError> {
    let s = s.trim();
    if let Some(hex_digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if hex_digits.is_empty() {
            return Ok(U256::zero());
        }
        return U256::from_str_radix(hex_digits, 16)
            .map_err(|e| PrimitiveError::InvalidNumber(format!("{s}: {e:?}")));
    }
    U256::from_dec_str(s).map_err(|e| PrimitiveError::InvalidNumber(format!("{s}: {e:?}")))
}
