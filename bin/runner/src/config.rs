use alloy_primitives::Address;
use amount::Decimal;
use ::config::{NetworkConfig, NetworkConfigBuilder, NetworkType};
use clap::Parser;
use client::DEFAULT_GAS_LIMIT;
use eyre::{eyre, WrapErr};
use serde::{Deserialize, Serialize};
use std::{path::Path, path::PathBuf, time::Duration};

/// What to do when a balance read fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BalanceReadPolicy {
    /// Abort the run
    #[default]
    Strict,
    /// Log a warning and report a zero balance
    ZeroOnError,
}

/// Runner configuration file.
///
/// Every field is optional; an absent file is the same as an empty one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Network the token lives on
    pub network: NetworkType,

    /// ERC20 token address, overrides the network default
    pub token_address: Option<Address>,

    /// Gas limit for every write call
    pub gas_limit: u64,

    /// Tokens the deployer transfers to the user (human units)
    pub transfer_amount: String,

    /// Tokens the deployer pulls back from the user (human units)
    pub transfer_from_amount: String,

    /// Per-transaction confirmation deadline, `0` waits forever.
    /// Defaults to the network's confirmation window.
    pub confirmation_timeout_secs: Option<u64>,

    pub balance_read_policy: BalanceReadPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkType::default(),
            token_address: None,
            gas_limit: DEFAULT_GAS_LIMIT,
            transfer_amount: "100".to_string(),
            transfer_from_amount: "10".to_string(),
            confirmation_timeout_secs: None,
            balance_read_policy: BalanceReadPolicy::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&contents)?;

        Ok(config)
    }

    /// Network defaults with the configured token override applied.
    pub const fn network_config(&self) -> NetworkConfig {
        let builder = NetworkConfigBuilder::from_network_type(self.network);
        match self.token_address {
            Some(token) => builder.token(token).build(),
            None => builder.build(),
        }
    }

    pub fn token_address(&self) -> eyre::Result<Address> {
        self.network_config()
            .token
            .ok_or_else(|| eyre!("No token address configured for {:?}", self.network))
    }

    pub fn confirmation_timeout(&self) -> Duration {
        self.confirmation_timeout_secs
            .map_or_else(|| self.network_config().confirmation_timeout(), Duration::from_secs)
    }

    pub fn scenario_settings(&self) -> eyre::Result<ScenarioSettings> {
        Ok(ScenarioSettings {
            transfer_amount: self
                .transfer_amount
                .parse()
                .wrap_err("Invalid transfer_amount")?,
            transfer_from_amount: self
                .transfer_from_amount
                .parse()
                .wrap_err("Invalid transfer_from_amount")?,
            balance_read_policy: self.balance_read_policy,
        })
    }
}

/// Amounts and policies the scenario runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioSettings {
    pub transfer_amount: Decimal,
    pub transfer_from_amount: Decimal,
    pub balance_read_policy: BalanceReadPolicy,
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            transfer_amount: Decimal::from(100u64),
            transfer_from_amount: Decimal::from(10u64),
            balance_read_policy: BalanceReadPolicy::Strict,
        }
    }
}

/// Command line, each option also read from the environment.
#[derive(Parser)]
#[command(name = "runner")]
#[command(about = "Run the ERC20 transfer, approve and transferFrom scenario")]
pub struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, env = "RUNNER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Node RPC endpoint (http(s):// or ws(s)://)
    #[arg(long, env = "BSCTESTNET_URL")]
    pub rpc_url: String,

    /// Deployer private key (hex string, with or without 0x prefix)
    #[arg(long, env = "DEPLOYER_PRIVATE_KEY", hide_env_values = true)]
    pub deployer_key: String,

    /// User private key (hex string, with or without 0x prefix)
    #[arg(long, env = "USER_PRIVATE_KEY", hide_env_values = true)]
    pub user_key: String,
}
