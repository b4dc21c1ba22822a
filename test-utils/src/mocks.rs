//! Mock implementations for testing.
//!
//! This module provides mock producers and senders for provider-side
//! verification tests.

use crate::fixtures::StockEvent;
use anyhow::bail;
use async_trait::async_trait;
use msgpact_verifier::MessageSender;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Mock stock feed that replays scripted events through a sender.
#[derive(Debug, Default)]
pub struct MockStockFeed {
    events: Arc<RwLock<Vec<StockEvent>>>,
}

impl MockStockFeed {
    /// Create an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a feed preloaded with events.
    #[must_use]
    pub fn with_events(events: Vec<StockEvent>) -> Self {
        Self {
            events: Arc::new(RwLock::new(events)),
        }
    }

    /// Queue an event.
    pub async fn push(&self, event: StockEvent) {
        self.events.write().await.push(event);
    }

    /// Number of queued events.
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    /// Whether the feed is empty.
    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    /// Publish every queued event through the sender, draining the feed.
    ///
    /// # Errors
    /// Propagates the first send failure; drained events are not requeued.
    pub async fn publish_to<S>(&self, sender: &S) -> anyhow::Result<usize>
    where
        S: MessageSender<StockEvent>,
    {
        let events = std::mem::take(&mut *self.events.write().await);
        let count = events.len();
        for event in events {
            sender.send(event).await?;
        }
        Ok(count)
    }
}

/// Sender that rejects every message.
#[derive(Debug, Clone)]
pub struct FailingSender {
    reason: String,
}

impl FailingSender {
    /// Create a sender that fails with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl<M: Send + 'static> MessageSender<M> for FailingSender {
    async fn send(&self, _message: M) -> anyhow::Result<()> {
        bail!("{}", self.reason)
    }
}
