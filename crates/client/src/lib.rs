pub mod account;

pub use account::{Account, TxAuthorization, DEFAULT_GAS_LIMIT};

use alloy_network::EthereumWallet;
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Error parsing or validating URLs
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// Error connecting to the RPC endpoint
    #[error("Connection error: {0}")]
    Connection(String),

    /// Error with private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Node rejected or failed an RPC request
    #[error("RPC error: {0}")]
    Rpc(String),
}

/// How new block headers reach the confirmation waiter for an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFeed {
    /// Push-based `eth_subscribe("newHeads")` over a persistent connection.
    PubSub,
    /// `eth_newBlockFilter` poller for plain HTTP endpoints.
    FilterPoll,
}

impl HeaderFeed {
    /// Pick the feed for `rpc_url` based on its scheme.
    pub fn for_url(rpc_url: &str) -> Result<Self, ClientError> {
        let url: Url = rpc_url
            .parse()
            .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;

        if !url.has_host() {
            return Err(ClientError::InvalidUrl(format!("missing host in {}", url)));
        }

        match url.scheme() {
            "ws" | "wss" => Ok(Self::PubSub),
            "http" | "https" => Ok(Self::FilterPoll),
            other => Err(ClientError::InvalidUrl(format!("unsupported scheme: {}", other))),
        }
    }
}

/// Chain parameters accounts are bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainInfo {
    pub chain_id: u64,
    /// Node-suggested gas price (in wei)
    pub gas_price: u128,
}

/// Convenience function to create an ethereum rpc provider from url.
///
/// Accepts `http(s)://` and `ws(s)://` endpoints.
pub async fn connect(rpc_url: &str) -> Result<DynProvider, ClientError> {
    HeaderFeed::for_url(rpc_url)?;

    let provider = ProviderBuilder::new()
        .connect(rpc_url)
        .await
        .map_err(|e| ClientError::Connection(format!("{}", e)))?;

    debug!(rpc_url, "Connected provider");
    Ok(provider.erased())
}

/// Create a provider that can sign for every given account.
///
/// The first account becomes the default signer; the others are selected by
/// the `from` field of each transaction.
pub async fn connect_with_accounts(
    rpc_url: &str,
    accounts: &[&Account],
) -> Result<DynProvider, ClientError> {
    HeaderFeed::for_url(rpc_url)?;

    let (first, rest) = accounts
        .split_first()
        .ok_or_else(|| ClientError::InvalidPrivateKey("no signing account given".to_string()))?;

    let mut wallet = EthereumWallet::from(first.signer().clone());
    for account in rest {
        wallet.register_signer(account.signer().clone());
    }

    let provider = ProviderBuilder::new()
        .wallet(wallet)
        .connect(rpc_url)
        .await
        .map_err(|e| ClientError::Connection(format!("{}", e)))?;

    debug!(rpc_url, signers = accounts.len(), "Connected wallet provider");
    Ok(provider.erased())
}

/// Query the network id and the node's suggested gas price.
pub async fn fetch_chain_info<P>(provider: &P) -> Result<ChainInfo, ClientError>
where
    P: Provider,
{
    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ClientError::Rpc(format!("{}", e)))?;
    let gas_price = provider
        .get_gas_price()
        .await
        .map_err(|e| ClientError::Rpc(format!("{}", e)))?;

    Ok(ChainInfo {
        chain_id,
        gas_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url() {
        let result = connect("not a url").await;
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_wallet_provider_needs_an_account() {
        let result = connect_with_accounts("http://127.0.0.1:8545", &[]).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_header_feed_for_url() {
        assert_eq!(
            HeaderFeed::for_url("wss://bsc-testnet.example.org/ws").unwrap(),
            HeaderFeed::PubSub
        );
        assert_eq!(
            HeaderFeed::for_url("ws://127.0.0.1:8546").unwrap(),
            HeaderFeed::PubSub
        );
        assert_eq!(
            HeaderFeed::for_url("HTTPS://data-seed-prebsc-1-s1.binance.org:8545").unwrap(),
            HeaderFeed::FilterPoll
        );
        assert!(HeaderFeed::for_url("ftp://example.org").is_err());
        assert!(HeaderFeed::for_url("http://").is_err());
        assert!(HeaderFeed::for_url("localhost:8545").is_err());
    }

    #[test]
    fn test_header_feed_rejects_malformed_authority() {
        for rpc_url in [
            "http://exa mple.org:notaport",
            "http://example.org:notaport",
            "ws://exa mple.org",
            "https://[::1",
        ] {
            assert!(
                matches!(HeaderFeed::for_url(rpc_url), Err(ClientError::InvalidUrl(_))),
                "{rpc_url} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_connect_rejects_malformed_authority() {
        let result = connect("http://exa mple.org:notaport").await;
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }
}
