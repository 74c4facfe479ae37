pub mod approve;
pub mod transfer;
pub mod transfer_from;

pub use approve::ApproveAction;
pub use transfer::TransferAction;
pub use transfer_from::TransferFromAction;

use alloy_primitives::{Address, TxHash};
use std::future::Future;

/// Trait for token write steps.
pub trait Action: Send + Sync {
    /// Check to see if the action can be executed.
    ///
    /// Returns true if all preconditions are met on-chain.
    fn is_ready(&self) -> impl Future<Output = eyre::Result<bool>> + Send;

    /// Submit the transaction.
    ///
    /// Fails without submitting when the action is not ready. Does not wait
    /// for the transaction to be mined.
    fn execute(&self) -> impl Future<Output = eyre::Result<TransactionHandle>> + Send;

    /// Get a human-readable description of this action.
    fn description(&self) -> String;
}

/// A submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionHandle {
    /// Transaction hash
    pub tx_hash: TxHash,
    /// Account that signed the transaction
    pub sender: Address,
    /// What the transaction does
    pub description: String,
}
