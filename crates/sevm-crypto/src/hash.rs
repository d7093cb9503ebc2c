//! Keccak-256 hashing

use sevm_primitives::{H256, U256};
use sha3::{Digest, Keccak256};

/// Compute Keccak-256 hash of the input data
pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    H256::from_bytes(result.into())
}

/// Keccak-256 digest read as a big-endian machine word
pub fn keccak256_word(data: &[u8]) -> U256 {
    keccak256(data).to_word()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        let hash = keccak256(&[]);
        assert_eq!(
            hash.to_hex(),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_keccak256_32_zero_bytes() {
        let hash = keccak256(&[0u8; 32]);
        assert_eq!(
            hash.to_hex(),
            "0x290decd9548b62a8d60345a988386fc84ba6bc95484008f6362f93160ef3e563"
        );
    }

    #[test]
    fn test_keccak256_word_matches_bytes() {
        let data = b"hello";
        let hash = keccak256(data);
        let word = keccak256_word(data);
        assert_eq!(H256::from_word(&word), hash);
        // High byte of the digest lands in the most significant position
        assert_eq!(word.byte(31), hash.as_bytes()[0]);
    }
}
