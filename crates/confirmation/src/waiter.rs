use crate::{ChainWatcher, Confirmation, ReceiptStatus, WaitError};
use alloy_primitives::TxHash;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Waits for a transaction to be mined, one receipt query per new block.
#[derive(Debug, Clone)]
pub struct ConfirmationWaiter<W> {
    watcher: W,
    timeout: Option<Duration>,
}

impl<W> ConfirmationWaiter<W>
where
    W: ChainWatcher,
{
    /// Create a waiter with no deadline.
    pub const fn new(watcher: W) -> Self {
        Self {
            watcher,
            timeout: None,
        }
    }

    /// Give up after `timeout`. A zero duration disables the deadline.
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() {
            None
        } else {
            Some(timeout)
        };
        self
    }

    pub const fn watcher(&self) -> &W {
        &self.watcher
    }

    /// Block until `tx_hash` has a receipt.
    ///
    /// A mined transaction with status 0 resolves to [`Confirmation::Failed`];
    /// a broken header subscription is an error, never a failed receipt.
    /// The subscription is released on every exit path.
    pub async fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
    ) -> Result<Confirmation, WaitError> {
        let mut subscription = self.watcher.subscribe_headers().await?;
        debug!(tx_hash = %tx_hash, timeout = ?self.timeout, "Waiting for confirmation");

        let timeout = self.timeout;
        let deadline = async move {
            match timeout {
                Some(timeout) => sleep(timeout).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(deadline);

        // A failure channel closed without a message only means the feed is
        // gone; the heads channel then reports the closure.
        let mut failure_open = true;
        let mut blocks_seen = 0u64;

        loop {
            tokio::select! {
                biased;

                failure = &mut subscription.failure, if failure_open => match failure {
                    Ok(reason) => {
                        subscription.unsubscribe();
                        warn!(tx_hash = %tx_hash, reason = %reason, "Header subscription failed");
                        return Err(WaitError::Subscription(reason));
                    }
                    Err(_) => failure_open = false,
                },

                head = subscription.heads.recv() => {
                    let Some(head) = head else {
                        subscription.unsubscribe();
                        return Err(WaitError::Subscription("header stream closed".to_string()));
                    };
                    blocks_seen += 1;

                    match self.watcher.receipt_status(tx_hash).await {
                        Ok(ReceiptStatus::Pending) => {
                            debug!(block = ?head.number, "Transaction still pending");
                        }
                        Ok(ReceiptStatus::Succeeded) => {
                            subscription.unsubscribe();
                            info!(tx_hash = %tx_hash, blocks_seen, "Transaction confirmed");
                            return Ok(Confirmation::Succeeded);
                        }
                        Ok(ReceiptStatus::Failed) => {
                            subscription.unsubscribe();
                            warn!(tx_hash = %tx_hash, blocks_seen, "Transaction reverted");
                            return Ok(Confirmation::Failed);
                        }
                        Err(e) => {
                            warn!(error = %e, "Receipt query failed, retrying on next block");
                        }
                    }
                }

                () = &mut deadline => {
                    subscription.unsubscribe();
                    let elapsed = self.timeout.unwrap_or_default();
                    warn!(tx_hash = %tx_hash, blocks_seen, "Confirmation timed out");
                    return Err(WaitError::Timeout(elapsed));
                }
            }
        }
    }
}
