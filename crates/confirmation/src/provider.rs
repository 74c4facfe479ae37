//! [`ChainWatcher`] backed by an alloy provider.

use crate::{
    subscription::{self, SubscriptionFeed},
    ChainWatcher, HeaderSubscription, NewHead, ReceiptStatus, WaitError,
};
use alloy_network::ReceiptResponse;
use alloy_primitives::TxHash;
use alloy_provider::Provider;
use client::HeaderFeed;
use futures::{future, stream, Stream, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

/// Heads buffered between the feed task and the waiter.
const HEAD_BUFFER: usize = 16;

/// Watches the chain through `provider`.
///
/// Each subscription runs a feed task that forwards heads until the waiter
/// unsubscribes. Pubsub endpoints push heads; HTTP endpoints install a block
/// filter and forward one head per poll that returns new blocks.
#[derive(Debug, Clone)]
pub struct ProviderWatcher<P> {
    provider: P,
    feed: HeaderFeed,
}

impl<P> ProviderWatcher<P>
where
    P: Provider + Clone + 'static,
{
    pub const fn new(provider: P, feed: HeaderFeed) -> Self {
        Self { provider, feed }
    }

    pub const fn feed(&self) -> HeaderFeed {
        self.feed
    }

    async fn subscribe_pubsub(&self, feed: SubscriptionFeed) -> Result<(), WaitError> {
        let blocks = self
            .provider
            .subscribe_blocks()
            .await
            .map_err(|e| WaitError::Subscribe(e.to_string()))?;
        let provider = self.provider.clone();
        let id = *blocks.local_id();
        debug!(subscription = %id, "Subscribed to new heads");

        let heads = stream::unfold(blocks, |mut blocks| async move {
            loop {
                match blocks.recv().await {
                    Ok(header) => {
                        let head = NewHead {
                            number: Some(header.inner.number),
                            hash: header.hash,
                        };
                        return Some((head, blocks));
                    }
                    // A later head still triggers a receipt query.
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "New heads subscription lagged");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        });

        tokio::spawn(async move {
            forward_heads(heads, feed, "new heads subscription closed by the node").await;

            if let Err(e) = provider.unsubscribe(id).await {
                debug!(subscription = %id, error = %e, "Failed to unsubscribe from new heads");
            }
        });

        Ok(())
    }

    async fn subscribe_filter(&self, feed: SubscriptionFeed) -> Result<(), WaitError> {
        let poller = self
            .provider
            .watch_blocks()
            .await
            .map_err(|e| WaitError::Subscribe(e.to_string()))?;

        // One receipt query per poll is enough however many blocks arrived
        // since the last one.
        let heads = poller.into_stream().filter_map(|hashes| {
            future::ready(hashes.last().map(|&hash| NewHead { number: None, hash }))
        });

        tokio::spawn(forward_heads(heads, feed, "block filter poller stopped"));

        Ok(())
    }
}

/// Pump `heads` into `feed` until the consumer stops listening.
///
/// The end of `heads` is reported through the feed as `closed`.
pub(crate) async fn forward_heads<S>(heads: S, mut feed: SubscriptionFeed, closed: &'static str)
where
    S: Stream<Item = NewHead>,
{
    let mut heads = std::pin::pin!(heads);

    loop {
        tokio::select! {
            biased;

            () = feed.stopped() => break,
            head = heads.next() => match head {
                Some(head) => {
                    if !feed.send_head(head).await {
                        break;
                    }
                }
                None => {
                    feed.fail(closed);
                    break;
                }
            }
        }
    }
}

impl<P> ChainWatcher for ProviderWatcher<P>
where
    P: Provider + Clone + 'static,
{
    async fn subscribe_headers(&self) -> Result<HeaderSubscription, WaitError> {
        let (feed, subscription) = subscription::channel(HEAD_BUFFER);

        match self.feed {
            HeaderFeed::PubSub => self.subscribe_pubsub(feed).await?,
            HeaderFeed::FilterPoll => self.subscribe_filter(feed).await?,
        }

        Ok(subscription)
    }

    async fn receipt_status(&self, tx_hash: TxHash) -> eyre::Result<ReceiptStatus> {
        let receipt = self.provider.get_transaction_receipt(tx_hash).await?;

        Ok(match receipt {
            None => ReceiptStatus::Pending,
            Some(receipt) if receipt.status() => ReceiptStatus::Succeeded,
            Some(_) => ReceiptStatus::Failed,
        })
    }
}
