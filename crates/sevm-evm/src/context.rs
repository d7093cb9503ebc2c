//! Read-only environment snapshot for a frame

use sevm_primitives::{parse_u256, Address, PrimitiveError, H256, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Default block gas limit
pub const DEFAULT_GAS_LIMIT: u64 = 30_000_000;

/// Default chain id
pub const DEFAULT_CHAIN_ID: u64 = 1;

/// Call context information
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallContext {
    /// Contract address being executed
    pub address: Address,
    /// Caller address
    pub caller: Address,
    /// Call value in wei
    pub value: U256,
    /// Gas budget reported by GAS (not metered)
    pub gas: u64,
}

impl CallContext {
    /// Create a new call context
    pub fn new(address: Address, caller: Address, value: U256, gas: u64) -> Self {
        Self {
            address,
            caller,
            value,
            gas,
        }
    }
}

/// Block environment information
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockContext {
    /// Block number
    pub number: u64,
    /// Block timestamp
    pub timestamp: u64,
    /// Block gas limit
    pub gas_limit: u64,
    /// Block coinbase (miner/validator)
    pub coinbase: Address,
    /// Block prevrandao
    pub prevrandao: H256,
    /// Chain ID
    pub chain_id: u64,
    /// Base fee (EIP-1559)
    pub base_fee: U256,
}

impl Default for BlockContext {
    fn default() -> Self {
        Self {
            number: 0,
            timestamp: 0,
            gas_limit: DEFAULT_GAS_LIMIT,
            coinbase: Address::ZERO,
            prevrandao: H256::ZERO,
            chain_id: DEFAULT_CHAIN_ID,
            base_fee: U256::zero(),
        }
    }
}

/// Transaction environment information
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TxContext {
    /// Transaction origin (original sender)
    pub origin: Address,
    /// Gas price
    pub gas_price: U256,
}

/// Complete execution environment
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Environment {
    /// Call context
    pub call: CallContext,
    /// Block context
    pub block: BlockContext,
    /// Transaction context
    pub tx: TxContext,
}

impl Environment {
    /// Create new environment
    pub fn new(call: CallContext, block: BlockContext, tx: TxContext) -> Self {
        Self { call, block, tx }
    }

    /// Build an environment whose identities come from `registry`
    pub fn resolve<R>(
        registry: &R,
        identity: &CallIdentity,
        block: BlockContext,
    ) -> Result<Self, ContextError>
    where
        R: AccountRegistry + ?Sized,
    {
        let lookup = |account: &AccountId| {
            registry
                .evm_address(account)
                .ok_or(ContextError::UnknownAccount(*account))
        };
        Ok(Self {
            call: CallContext {
                address: lookup(&identity.contract)?,
                caller: lookup(&identity.caller)?,
                value: identity.value,
                gas: identity.gas,
            },
            block,
            tx: TxContext {
                origin: lookup(&identity.origin)?,
                gas_price: identity.gas_price,
            },
        })
    }
}

// ==================== Account registry ====================

/// Host-native account identifier
pub type AccountId = H256;

/// Maps host accounts to the EVM addresses a frame observes
pub trait AccountRegistry {
    /// EVM address registered for `account`
    fn evm_address(&self, account: &AccountId) -> Option<Address>;
}

/// In-memory registry
#[derive(Clone, Debug, Default)]
pub struct StaticRegistry {
    accounts: HashMap<AccountId, Address>,
}

impl StaticRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account, returning the previous address if any
    pub fn register(&mut self, account: AccountId, address: Address) -> Option<Address> {
        self.accounts.insert(account, address)
    }

    /// Number of registered accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Check if no account is registered
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountRegistry for StaticRegistry {
    fn evm_address(&self, account: &AccountId) -> Option<Address> {
        self.accounts.get(account).copied()
    }
}

/// Host accounts taking part in a call, plus the call's scalar inputs
#[derive(Clone, Debug, Default)]
pub struct CallIdentity {
    /// Account whose code runs
    pub contract: AccountId,
    /// Immediate caller
    pub caller: AccountId,
    /// Transaction sender
    pub origin: AccountId,
    /// Call value
    pub value: U256,
    /// Gas budget reported by GAS
    pub gas: u64,
    /// Transaction gas price
    pub gas_price: U256,
}

/// Environment construction errors
#[derive(Debug, Error)]
pub enum ContextError {
    /// Account is missing from the registry
    #[error("account {0} is not registered")]
    UnknownAccount(AccountId),

    /// Malformed numeric field
    #[error("invalid {field}: {source}")]
    InvalidField {
        /// Field name
        field: &'static str,
        /// Parse failure
        #[source]
        source: PrimitiveError,
    },
}

// ==================== File configuration ====================

/// Environment as written in TOML or JSON.
///
/// Word-sized fields are strings holding either decimal or `0x` hex.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Contract address
    #[serde(default)]
    pub address: Address,
    /// Caller address
    #[serde(default)]
    pub caller: Address,
    /// Transaction origin
    #[serde(default)]
    pub origin: Address,
    /// Call value
    #[serde(default)]
    pub value: String,
    /// Gas budget reported by GAS
    #[serde(default)]
    pub gas: u64,
    /// Block number
    #[serde(default)]
    pub number: u64,
    /// Block timestamp
    #[serde(default)]
    pub timestamp: u64,
    /// Block gas limit
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
    /// Block coinbase
    #[serde(default)]
    pub coinbase: Address,
    /// Block prevrandao
    #[serde(default)]
    pub prevrandao: H256,
    /// Chain ID
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// Base fee
    #[serde(default)]
    pub base_fee: String,
    /// Gas price
    #[serde(default)]
    pub gas_price: String,
}

fn default_gas_limit() -> u64 {
    DEFAULT_GAS_LIMIT
}

fn default_chain_id() -> u64 {
    DEFAULT_CHAIN_ID
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            address: Address::ZERO,
            caller: Address::ZERO,
            origin: Address::ZERO,
            value: String::new(),
            gas: 0,
            number: 0,
            timestamp: 0,
            gas_limit: default_gas_limit(),
            coinbase: Address::ZERO,
            prevrandao: H256::ZERO,
            chain_id: default_chain_id(),
            base_fee: String::new(),
            gas_price: String::new(),
        }
    }
}

impl EnvironmentConfig {
    /// Parse word fields and assemble the environment
    pub fn to_environment(&self) -> Result<Environment, ContextError> {
        Ok(Environment {
            call: CallContext {
                address: self.address,
                caller: self.caller,
                value: parse_word("value", &self.value)?,
                gas: self.gas,
            },
            block: BlockContext {
                number: self.number,
                timestamp: self.timestamp,
                gas_limit: self.gas_limit,
                coinbase: self.coinbase,
                prevrandao: self.prevrandao,
                chain_id: self.chain_id,
                base_fee: parse_word("base_fee", &self.base_fee)?,
            },
            tx: TxContext {
                origin: self.origin,
                gas_price: parse_word("gas_price", &self.gas_price)?,
            },
        })
    }
}

fn parse_word(field: &'static str, s: &str) -> Result<U256, ContextError> {
    if s.trim().is_empty() {
        return Ok(U256::zero());
    }
    parse_u256(s).map_err(|source| ContextError::InvalidField { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_default() {
        let env = Environment::default();
        assert_eq!(env.call.address, Address::ZERO);
        assert_eq!(env.call.value, U256::zero());
        assert_eq!(env.block.gas_limit, 30_000_000);
        assert_eq!(env.block.chain_id, 1);
        assert_eq!(env.tx.gas_price, U256::zero());
    }

    #[test]
    fn test_call_context_new() {
        let address = Address::from_bytes([0x11; 20]);
        let caller = Address::from_bytes([0x22; 20]);
        let ctx = CallContext::new(address, caller, U256::from(1000), 100_000);

        assert_eq!(ctx.address, address);
        assert_eq!(ctx.caller, caller);
        assert_eq!(ctx.value, U256::from(1000));
        assert_eq!(ctx.gas, 100_000);
    }

    #[test]
    fn test_resolve_through_registry() {
        let contract = H256::from_bytes([0xc0; 32]);
        let caller = H256::from_bytes([0xca; 32]);
        let mut registry = StaticRegistry::new();
        registry.register(contract, Address::from_low_u64(0xc0));
        registry.register(caller, Address::from_low_u64(1));

        let identity = CallIdentity {
            contract,
            caller,
            origin: caller,
            value: U256::from(5),
            ..Default::default()
        };
        let env = Environment::resolve(&registry, &identity, BlockContext::default()).unwrap();
        assert_eq!(env.call.address, Address::from_low_u64(0xc0));
        assert_eq!(env.call.caller, Address::from_low_u64(1));
        assert_eq!(env.tx.origin, Address::from_low_u64(1));
        assert_eq!(env.call.value, U256::from(5));
    }

    #[test]
    fn test_resolve_unknown_account() {
        let registry = StaticRegistry::new();
        let identity = CallIdentity::default();
        let err = Environment::resolve(&registry, &identity, BlockContext::default()).unwrap_err();
        assert!(matches!(err, ContextError::UnknownAccount(id) if id == H256::ZERO));
    }

    #[test]
    fn test_registry_register_replaces() {
        let mut registry = StaticRegistry::new();
        let id = H256::from_bytes([1; 32]);
        assert!(registry.is_empty());
        assert_eq!(registry.register(id, Address::from_low_u64(1)), None);
        assert_eq!(
            registry.register(id, Address::from_low_u64(2)),
            Some(Address::from_low_u64(1))
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.evm_address(&id), Some(Address::from_low_u64(2)));
    }

    #[test]
    fn test_config_defaults_match_environment() {
        let config = EnvironmentConfig::default();
        assert_eq!(config.to_environment().unwrap(), Environment::default());
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            caller = "0x0000000000000000000000000000000000000001"
            chain_id = 1263227476
            number = 7
            value = "0x10"
            base_fee = "10"
        "#;
        let config: EnvironmentConfig = toml::from_str(toml_str).unwrap();
        let env = config.to_environment().unwrap();
        assert_eq!(env.call.caller, Address::from_low_u64(1));
        assert_eq!(env.block.chain_id, 0x4B4B_5254);
        assert_eq!(env.block.number, 7);
        assert_eq!(env.block.gas_limit, DEFAULT_GAS_LIMIT);
        assert_eq!(env.call.value, U256::from(16));
        assert_eq!(env.block.base_fee, U256::from(10));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{"gas_limit": 0, "timestamp": 1}"#;
        let config: EnvironmentConfig = serde_json::from_str(json).unwrap();
        let env = config.to_environment().unwrap();
        assert_eq!(env.block.gas_limit, 0);
        assert_eq!(env.block.timestamp, 1);
        assert_eq!(env.block.chain_id, DEFAULT_CHAIN_ID);
    }

    #[test]
    fn test_config_rejects_unknown_field() {
        let json = r#"{"chainid": 5}"#;
        assert!(serde_json::from_str::<EnvironmentConfig>(json).is_err());
    }

    #[test]
    fn test_config_invalid_word() {
        let config = EnvironmentConfig {
            gas_price: "lots".to_string(),
            ..Default::default()
        };
        match config.to_environment() {
            Err(ContextError::InvalidField { field: "gas_price", .. }) => {}
            other => panic!("Expected InvalidField error, got {:?}", other),
        }
    }
}
