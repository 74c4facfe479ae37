use crate::{Action, TransactionHandle};
use alloy_primitives::{Address, U256};
use amount::format_units;
use client::Account;
use token::TokenProxy;
use tracing::info;

/// Transfer input data.
#[derive(Debug, Clone, Copy)]
pub struct Transfer {
    pub to: Address,
    /// Raw amount in the token's smallest unit
    pub amount: U256,
    /// Token decimals, used for descriptions only
    pub decimals: u8,
}

pub struct TransferAction<'a, T> {
    token: &'a T,
    sender: &'a Account,
    action: Transfer,
}

impl<'a, T: TokenProxy> TransferAction<'a, T> {
    pub const fn new(token: &'a T, sender: &'a Account, action: Transfer) -> Self {
        Self {
            token,
            sender,
            action,
        }
    }
}

impl<T> Action for TransferAction<'_, T>
where
    T: TokenProxy,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        if self.action.amount == U256::ZERO {
            return Ok(false);
        }

        if self.action.to == Address::ZERO {
            return Ok(false);
        }

        let balance = self.token.balance_of(self.sender.address()).await?;
        Ok(balance >= self.action.amount)
    }

    async fn execute(&self) -> eyre::Result<TransactionHandle> {
        if !self.is_ready().await? {
            eyre::bail!("{}: insufficient balance or invalid input", self.description());
        }

        let tx_hash = self
            .token
            .transfer(self.sender, self.action.to, self.action.amount)
            .await?;

        info!(tx_hash = %tx_hash, "Transfer submitted.");

        Ok(TransactionHandle {
            tx_hash,
            sender: self.sender.address(),
            description: self.description(),
        })
    }

    fn description(&self) -> String {
        format!(
            "Transfer {} tokens from {} to {}",
            format_units(self.action.amount, self.action.decimals),
            self.sender.address(),
            self.action.to
        )
    }
}
