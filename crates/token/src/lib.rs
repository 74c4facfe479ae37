//! Typed access to an ERC20 token contract.
//!
//! This crate provides the [`TokenProxy`] call surface the runner drives,
//! an alloy-backed implementation in [`erc20`], and decoding of the
//! `Transfer` / `Approval` events in [`events`].

pub mod erc20;
pub mod events;

pub use erc20::Erc20Proxy;
pub use events::{decode_events, TokenEvent};

use alloy_primitives::{Address, TxHash, U256};
use client::Account;
use std::future::Future;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    /// The node rejected a read or write call
    #[error("Contract call `{method}` failed: {message}")]
    ContractCall {
        method: &'static str,
        message: String,
    },
}

impl TokenError {
    pub fn call(method: &'static str, err: impl std::fmt::Display) -> Self {
        Self::ContractCall {
            method,
            message: err.to_string(),
        }
    }
}

/// Token metadata read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
}

/// Call surface of an ERC20 token.
///
/// Write methods return as soon as the node accepts the transaction; use a
/// confirmation waiter to learn its outcome.
pub trait TokenProxy: Send + Sync {
    fn name(&self) -> impl Future<Output = Result<String, TokenError>> + Send;

    fn symbol(&self) -> impl Future<Output = Result<String, TokenError>> + Send;

    fn decimals(&self) -> impl Future<Output = Result<u8, TokenError>> + Send;

    fn total_supply(&self) -> impl Future<Output = Result<U256, TokenError>> + Send;

    fn balance_of(&self, owner: Address) -> impl Future<Output = Result<U256, TokenError>> + Send;

    fn allowance(
        &self,
        owner: Address,
        spender: Address,
    ) -> impl Future<Output = Result<U256, TokenError>> + Send;

    /// Move `amount` from `from`'s balance to `to`.
    fn transfer(
        &self,
        from: &Account,
        to: Address,
        amount: U256,
    ) -> impl Future<Output = Result<TxHash, TokenError>> + Send;

    /// Let `spender` move up to `amount` out of `owner`'s balance.
    fn approve(
        &self,
        owner: &Account,
        spender: Address,
        amount: U256,
    ) -> impl Future<Output = Result<TxHash, TokenError>> + Send;

    /// Move `amount` from `from` to `to` using `spender`'s allowance.
    fn transfer_from(
        &self,
        spender: &Account,
        from: Address,
        to: Address,
        amount: U256,
    ) -> impl Future<Output = Result<TxHash, TokenError>> + Send;
}

/// Read name, symbol, decimals and total supply.
pub async fn read_metadata<T: TokenProxy>(token: &T) -> Result<TokenMetadata, TokenError> {
    Ok(TokenMetadata {
        name: token.name().await?,
        symbol: token.symbol().await?,
        decimals: token.decimals().await?,
        total_supply: token.total_supply().await?,
    })
}
