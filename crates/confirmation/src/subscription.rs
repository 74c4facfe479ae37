//! Channel pair connecting a header source to a waiter.
//!
//! The source side ([`SubscriptionFeed`]) pushes heads and at most one
//! failure; the consumer side ([`HeaderSubscription`]) receives them and
//! signals unsubscribe exactly once by being consumed.

use alloy_primitives::B256;
use tokio::sync::{mpsc, oneshot};

/// A new block notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewHead {
    /// Block number, when the feed reports it
    pub number: Option<u64>,
    pub hash: B256,
}

/// Consumer side of a header subscription.
#[derive(Debug)]
pub struct HeaderSubscription {
    pub(crate) heads: mpsc::Receiver<NewHead>,
    pub(crate) failure: oneshot::Receiver<String>,
    stop: oneshot::Sender<()>,
}

impl HeaderSubscription {
    /// Stop the feed.
    pub fn unsubscribe(self) {
        // The feed may already be gone.
        let _ = self.stop.send(());
    }
}

/// Producer side of a header subscription.
#[derive(Debug)]
pub struct SubscriptionFeed {
    heads: mpsc::Sender<NewHead>,
    failure: Option<oneshot::Sender<String>>,
    stop: oneshot::Receiver<()>,
    /// The stop channel has resolved, by unsubscribe or by drop
    stop_resolved: bool,
    unsubscribed: bool,
}

impl SubscriptionFeed {
    /// Deliver a head. Returns false once the consumer is gone.
    pub async fn send_head(&self, head: NewHead) -> bool {
        self.heads.send(head).await.is_ok()
    }

    /// Deliver a head without waiting for buffer space.
    pub fn try_send_head(&self, head: NewHead) -> bool {
        self.heads.try_send(head).is_ok()
    }

    /// Report that the subscription broke. Only the first report is delivered.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if let Some(failure) = self.failure.take() {
            let _ = failure.send(reason.into());
        }
    }

    /// Resolves once the consumer unsubscribes or drops the subscription.
    ///
    /// Cancel safe: dropping the future before it resolves leaves the feed
    /// listening, so it can sit in a `select!` loop.
    pub async fn stopped(&mut self) {
        if self.stop_resolved {
            return;
        }
        let result = (&mut self.stop).await;
        self.stop_resolved = true;
        self.unsubscribed = result.is_ok();
    }

    /// Whether the consumer explicitly called [`HeaderSubscription::unsubscribe`].
    pub fn unsubscribe_requested(&mut self) -> bool {
        if !self.stop_resolved {
            match self.stop.try_recv() {
                Ok(()) => {
                    self.stop_resolved = true;
                    self.unsubscribed = true;
                }
                Err(oneshot::error::TryRecvError::Closed) => self.stop_resolved = true,
                Err(oneshot::error::TryRecvError::Empty) => {}
            }
        }
        self.unsubscribed
    }
}

/// Create a connected feed and subscription with room for `capacity` heads.
pub fn channel(capacity: usize) -> (SubscriptionFeed, HeaderSubscription) {
    let (heads_tx, heads_rx) = mpsc::channel(capacity);
    let (failure_tx, failure_rx) = oneshot::channel();
    let (stop_tx, stop_rx) = oneshot::channel();

    (
        SubscriptionFeed {
            heads: heads_tx,
            failure: Some(failure_tx),
            stop: stop_rx,
            stop_resolved: false,
            unsubscribed: false,
        },
        HeaderSubscription {
            heads: heads_rx,
            failure: failure_rx,
            stop: stop_tx,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_unsubscribe_reaches_feed() {
        let (mut feed, subscription) = channel(1);
        subscription.unsubscribe();

        feed.stopped().await;
        assert!(feed.unsubscribe_requested());
    }

    #[tokio::test]
    async fn test_cancelled_stopped_keeps_listening() {
        let (mut feed, subscription) = channel(1);

        for _ in 0..3 {
            let waited = timeout(Duration::from_millis(10), feed.stopped()).await;
            assert!(waited.is_err(), "stopped() resolved without unsubscribe");
        }
        assert!(!feed.unsubscribe_requested());

        subscription.unsubscribe();
        timeout(Duration::from_secs(1), feed.stopped())
            .await
            .expect("stopped() should resolve after unsubscribe");
        assert!(feed.unsubscribe_requested());
    }

    #[tokio::test]
    async fn test_drop_is_not_unsubscribe() {
        let (mut feed, subscription) = channel(1);
        drop(subscription);

        feed.stopped().await;
        assert!(!feed.unsubscribe_requested());
        assert!(!feed.send_head(NewHead { number: Some(1), hash: B256::ZERO }).await);
    }

    #[tokio::test]
    async fn test_only_first_failure_is_delivered() {
        let (mut feed, mut subscription) = channel(1);
        feed.fail("first");
        feed.fail("second");

        assert_eq!((&mut subscription.failure).await.unwrap(), "first");
    }
}
