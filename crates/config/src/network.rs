//! Network configuration for the token runner.
//!
//! Provides chain-specific addresses and parameters for different networks
//! (mainnet, testnet).

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of blocks a confirmation wait may span before giving up.
pub const CONFIRMATION_BLOCKS: u64 = 40;

/// Network type (mainnet or testnet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Mainnet,
    #[default]
    Testnet,
}

/// Chain parameters and the token deployment for one network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network type (mainnet or testnet)
    pub network_type: NetworkType,
    /// Chain ID
    pub chain_id: u64,
    /// ERC20 token contract address, if one is deployed on this network
    pub token: Option<Address>,
    /// Block time in seconds (3 for BSC)
    pub block_time_secs: u64,
}

impl NetworkConfig {
    /// BNB Smart Chain mainnet configuration.
    pub const fn bsc_mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            chain_id: 56,
            token: None,
            block_time_secs: 3,
        }
    }

    /// BNB Smart Chain testnet configuration.
    pub const fn bsc_testnet() -> Self {
        Self {
            network_type: NetworkType::Testnet,
            chain_id: 97,
            // https://testnet.bscscan.com/address/0x8e374AbDFecEf1203BFC142FCA2E93819C98f2fC
            token: Some(address!("0x8e374AbDFecEf1203BFC142FCA2E93819C98f2fC")),
            block_time_secs: 3,
        }
    }

    /// Create configuration from network type.
    pub const fn from_network_type(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Mainnet => Self::bsc_mainnet(),
            NetworkType::Testnet => Self::bsc_testnet(),
        }
    }

    /// Default upper bound for waiting on a single transaction.
    pub const fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.block_time_secs * CONFIRMATION_BLOCKS)
    }
}

/// Network defaults with per-deployment overrides.
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
    config: NetworkConfig,
}

impl NetworkConfigBuilder {
    pub const fn from_network_type(network_type: NetworkType) -> Self {
        Self {
            config: NetworkConfig::from_network_type(network_type),
        }
    }

    /// Use a token deployed somewhere other than the network default.
    pub const fn token(mut self, address: Address) -> Self {
        self.config.token = Some(address);
        self
    }

    pub const fn build(self) -> NetworkConfig {
        self.config
    }
}
