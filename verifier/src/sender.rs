//! Message sender capability: the transport seam for provider code.
//!
//! Production wiring implements [`MessageSender`] against a real broker;
//! verification wiring injects a [`CapturingSender`] so the messages a code
//! path would have sent can be replayed against the contract without any
//! transport.

use crate::scenario::ProducedMessage;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Outbound message transport.
#[async_trait]
pub trait MessageSender<M: Send + 'static>: Send + Sync {
    /// Send one message.
    async fn send(&self, message: M) -> anyhow::Result<()>;
}

/// Sender that records messages instead of dispatching them.
///
/// Clones share the same capture buffer, so one handle can be injected
/// into provider code while the test keeps another to read from.
pub struct CapturingSender<M> {
    sent: Arc<RwLock<Vec<M>>>,
}

impl<M> Clone for CapturingSender<M> {
    fn clone(&self) -> Self {
        Self {
            sent: Arc::clone(&self.sent),
        }
    }
}

impl<M> Default for CapturingSender<M> {
    fn default() -> Self {
        Self {
            sent: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl<M> CapturingSender<M> {
    /// Create an empty capturing sender.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of captured messages.
    pub async fn len(&self) -> usize {
        self.sent.read().await.len()
    }

    /// Whether nothing has been captured.
    pub async fn is_empty(&self) -> bool {
        self.sent.read().await.is_empty()
    }

    /// Drain the captured messages.
    pub async fn take(&self) -> Vec<M> {
        std::mem::take(&mut *self.sent.write().await)
    }
}

impl<M: Clone> CapturingSender<M> {
    /// Snapshot of the captured messages.
    pub async fn captured(&self) -> Vec<M> {
        self.sent.read().await.clone()
    }
}

impl<M: Serialize> CapturingSender<M> {
    /// Drain captures into produced messages for verification.
    ///
    /// # Errors
    /// Returns an error when a captured payload does not serialize.
    pub async fn take_messages(&self) -> anyhow::Result<Vec<ProducedMessage>> {
        self.take()
            .await
            .iter()
            .map(ProducedMessage::from_serialize)
            .collect()
    }
}

#[async_trait]
impl<M: Send + Sync + 'static> MessageSender<M> for CapturingSender<M> {
    async fn send(&self, message: M) -> anyhow::Result<()> {
        self.sent.write().await.push(message);
        Ok(())
    }
}
