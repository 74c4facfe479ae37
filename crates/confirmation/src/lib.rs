//! Transaction confirmation driven by new block headers.
//!
//! [`ConfirmationWaiter`] subscribes to new heads through a [`ChainWatcher`]
//! and checks the receipt of one transaction each time a block arrives. It
//! never polls on its own clock; the only timer is the optional deadline.

pub mod provider;
pub mod subscription;
pub mod waiter;

pub use provider::ProviderWatcher;
pub use subscription::{HeaderSubscription, NewHead, SubscriptionFeed};
pub use waiter::ConfirmationWaiter;

use alloy_primitives::TxHash;
use std::{future::Future, time::Duration};
use thiserror::Error;

/// Receipt state of a transaction as seen by the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    /// No receipt yet
    Pending,
    /// Mined with status 0
    Failed,
    /// Mined with status 1
    Succeeded,
}

/// Terminal outcome of a confirmation wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Succeeded,
    Failed,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WaitError {
    /// The header subscription could not be opened
    #[error("Failed to subscribe to new heads: {0}")]
    Subscribe(String),

    /// The header subscription broke before the receipt resolved
    #[error("Header subscription error: {0}")]
    Subscription(String),

    /// No receipt resolved before the deadline
    #[error("Transaction not confirmed within {0:?}")]
    Timeout(Duration),
}

/// Source of new-head notifications and transaction receipts.
pub trait ChainWatcher: Send + Sync {
    /// Open a new-head subscription.
    fn subscribe_headers(
        &self,
    ) -> impl Future<Output = Result<HeaderSubscription, WaitError>> + Send;

    /// Look up the receipt status of `tx_hash`.
    fn receipt_status(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = eyre::Result<ReceiptStatus>> + Send;
}
