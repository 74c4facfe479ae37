//! Configuration types for the token runner.
//!
//! This crate provides:
//! - Network configurations (BSC mainnet, BSC testnet)
//! - The token contract address deployed on each network
//! - Chain parameters used to bound confirmation waits

pub mod network;

pub use network::{NetworkConfig, NetworkConfigBuilder, NetworkType};
