//! Type definitions for the fixture JSON format

use serde::{Deserialize, Deserializer};
use sevm_evm::{EnvironmentConfig, HaltReason};
use sevm_primitives::{parse_u256, U256};
use std::collections::BTreeMap;

/// Hex-encoded bytes, with or without a `0x` prefix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HexBytes(pub Vec<u8>);

impl<'de> Deserialize<'de> for HexBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        if s.is_empty() {
            return Ok(HexBytes(Vec::new()));
        }
        hex::decode(s)
            .map(HexBytes)
            .map_err(serde::de::Error::custom)
    }
}

/// Comma-separated words, bottom of the stack first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList(pub Vec<U256>);

impl WordList {
    /// Parse a comma-separated list of decimal or `0x` hex words
    pub fn parse(s: &str) -> Result<Self, String> {
        if s.trim().is_empty() {
            return Ok(WordList(Vec::new()));
        }
        s.split(',')
            .map(|item| parse_u256(item).map_err(|e| e.to_string()))
            .collect::<Result<Vec<_>, _>>()
            .map(WordList)
    }
}

impl<'de> Deserialize<'de> for WordList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        WordList::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Expected halt reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedHalt {
    /// STOP or end of code
    Stopped,
    /// RETURN
    Returned,
    /// REVERT
    Reverted,
    /// Any fault
    Invalid,
}

impl ExpectedHalt {
    /// Whether an actual halt reason satisfies this expectation
    pub fn matches(self, actual: HaltReason) -> bool {
        matches!(
            (self, actual),
            (ExpectedHalt::Stopped, HaltReason::Stopped)
                | (ExpectedHalt::Returned, HaltReason::Returned)
                | (ExpectedHalt::Reverted, HaltReason::Reverted)
                | (ExpectedHalt::Invalid, HaltReason::Invalid)
        )
    }
}

/// Fixture file: map of case name to case
pub type FixtureFile = BTreeMap<String, FixtureCase>;

/// A single fixture case
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureCase {
    /// Bytecode
    pub code: HexBytes,
    /// Call input
    #[serde(default)]
    pub calldata: HexBytes,
    /// Expected final stack
    #[serde(default)]
    pub stack: WordList,
    /// Expected final memory
    #[serde(default)]
    pub memory: HexBytes,
    /// Expected return data
    #[serde(default)]
    pub return_value: HexBytes,
    /// Expected halt reason (unchecked when absent)
    #[serde(default)]
    pub halt: Option<ExpectedHalt>,
    /// Environment overrides
    #[serde(default)]
    pub env: Option<EnvironmentConfig>,
    /// Reason to skip the case
    #[serde(default)]
    pub skip: Option<String>,
}
