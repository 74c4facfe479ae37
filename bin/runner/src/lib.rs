//! The scripted token scenario.
//!
//! Reads the token decimals and both balances, then runs three confirmed
//! writes: the deployer transfers to the user, the user approves the
//! deployer, and the deployer pulls part of it back with `transferFrom`.
//! Balances are read again after the transfer and at the end.

pub mod config;

use crate::config::{BalanceReadPolicy, ScenarioSettings};
use action::{
    approve::Approve, transfer::Transfer, transfer_from::TransferFrom, Action, ApproveAction,
    TransactionHandle, TransferAction, TransferFromAction,
};
use alloy_primitives::{Address, U256};
use amount::{format_units, to_wei};
use client::Account;
use confirmation::{ChainWatcher, Confirmation, ConfirmationWaiter};
use eyre::bail;
use token::TokenProxy;
use tracing::{info, warn};

/// Token balances of both accounts at one point of the scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub deployer: U256,
    pub user: U256,
}

/// Everything observed during a scenario run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    pub decimals: u8,
    pub initial: BalanceSnapshot,
    pub after_transfer: BalanceSnapshot,
    pub final_balances: BalanceSnapshot,
    /// Allowance left to the deployer after `transferFrom`
    pub remaining_allowance: U256,
    /// Confirmed transactions in submission order
    pub transactions: Vec<TransactionHandle>,
}

pub struct Scenario<'a, T, W> {
    token: &'a T,
    waiter: &'a ConfirmationWaiter<W>,
    deployer: &'a Account,
    user: &'a Account,
    settings: ScenarioSettings,
}

impl<'a, T, W> Scenario<'a, T, W>
where
    T: TokenProxy,
    W: ChainWatcher,
{
    pub const fn new(
        token: &'a T,
        waiter: &'a ConfirmationWaiter<W>,
        deployer: &'a Account,
        user: &'a Account,
        settings: ScenarioSettings,
    ) -> Self {
        Self {
            token,
            waiter,
            deployer,
            user,
            settings,
        }
    }

    pub async fn run(&self) -> eyre::Result<ScenarioReport> {
        let deployer = self.deployer.address();
        let user = self.user.address();
        info!(%deployer, %user, "Running token scenario");

        let decimals = self.token.decimals().await?;
        info!(decimals, "Token decimals");

        let initial = self.balances(decimals, "initial").await?;
        let mut transactions = Vec::with_capacity(3);

        let transfer_amount = to_wei(&self.settings.transfer_amount, decimals)?;
        let transfer = TransferAction::new(
            self.token,
            self.deployer,
            Transfer {
                to: user,
                amount: transfer_amount,
                decimals,
            },
        );
        transactions.push(self.confirm(&transfer).await?);

        let after_transfer = self.balances(decimals, "after transfer").await?;

        let approve = ApproveAction::new(
            self.token,
            self.user,
            Approve {
                spender: deployer,
                amount: transfer_amount,
                decimals,
            },
        );
        transactions.push(self.confirm(&approve).await?);

        let transfer_from = TransferFromAction::new(
            self.token,
            self.deployer,
            TransferFrom {
                from: user,
                to: deployer,
                amount: to_wei(&self.settings.transfer_from_amount, decimals)?,
                decimals,
            },
        );
        transactions.push(self.confirm(&transfer_from).await?);

        let final_balances = self.balances(decimals, "final").await?;
        let remaining_allowance = self.token.allowance(user, deployer).await?;
        info!(
            allowance = %format_units(remaining_allowance, decimals),
            "Remaining allowance"
        );

        Ok(ScenarioReport {
            decimals,
            initial,
            after_transfer,
            final_balances,
            remaining_allowance,
            transactions,
        })
    }

    /// Submit `action` and wait until it is mined successfully.
    async fn confirm<A: Action>(&self, action: &A) -> eyre::Result<TransactionHandle> {
        let handle = action.execute().await?;
        info!(tx_hash = %handle.tx_hash, "Waiting for: {}", handle.description);

        match self.waiter.wait_for_confirmation(handle.tx_hash).await? {
            Confirmation::Succeeded => Ok(handle),
            Confirmation::Failed => bail!(
                "Transaction {} reverted: {}",
                handle.tx_hash,
                handle.description
            ),
        }
    }

    async fn balances(&self, decimals: u8, stage: &str) -> eyre::Result<BalanceSnapshot> {
        let snapshot = BalanceSnapshot {
            deployer: self.balance_of(self.deployer.address()).await?,
            user: self.balance_of(self.user.address()).await?,
        };

        info!(
            stage,
            deployer = %format_units(snapshot.deployer, decimals),
            user = %format_units(snapshot.user, decimals),
            "Balances"
        );
        Ok(snapshot)
    }

    async fn balance_of(&self, owner: Address) -> eyre::Result<U256> {
        match self.token.balance_of(owner).await {
            Ok(balance) => Ok(balance),
            Err(e) if self.settings.balance_read_policy == BalanceReadPolicy::ZeroOnError => {
                warn!(%owner, error = %e, "Balance read failed, reporting zero");
                Ok(U256::ZERO)
            }
            Err(e) => Err(e.into()),
        }
    }
}
