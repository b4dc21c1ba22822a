//! Scenario registry: provider triggers keyed by interaction description.
//!
//! A trigger is the provider's own message-producing code path, wrapped in
//! a closure that returns the messages it would have sent. The registry is
//! populated before a run and read-only during it; triggers never run
//! concurrently.

use crate::error::{VerifierError, VerifierResult};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// A message produced by provider code during verification.
#[derive(Debug, Clone, PartialEq)]
pub struct ProducedMessage {
    /// Key/value metadata accompanying the payload
    pub metadata: BTreeMap<String, Value>,
    /// JSON payload
    pub contents: Value,
}

impl ProducedMessage {
    /// Message with the given contents and no metadata.
    #[must_use]
    pub fn new(contents: impl Into<Value>) -> Self {
        Self {
            metadata: BTreeMap::new(),
            contents: contents.into(),
        }
    }

    /// Add a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Build from any serializable payload.
    ///
    /// # Errors
    /// Returns an error when the payload does not serialize to JSON.
    pub fn from_serialize<T: Serialize>(payload: &T) -> anyhow::Result<Self> {
        Ok(Self::new(serde_json::to_value(payload)?))
    }
}

/// Conversion from trigger return values into the message batch to verify.
pub trait IntoMessages {
    /// The produced messages, in emission order.
    fn into_messages(self) -> Vec<ProducedMessage>;
}

impl IntoMessages for ProducedMessage {
    fn into_messages(self) -> Vec<ProducedMessage> {
        vec![self]
    }
}

impl IntoMessages for Vec<ProducedMessage> {
    fn into_messages(self) -> Vec<ProducedMessage> {
        self
    }
}

/// Future returned by trigger actions.
pub type TriggerFuture = Pin<Box<dyn Future<Output = anyhow::Result<Vec<ProducedMessage>>> + Send>>;

/// A registered provider action producing the messages for one description.
pub struct Trigger {
    action: Box<dyn Fn() -> TriggerFuture + Send + Sync>,
}

impl Trigger {
    /// Run the action to completion.
    ///
    /// # Errors
    /// Propagates whatever the provider action fails with.
    pub async fn run(&self) -> anyhow::Result<Vec<ProducedMessage>> {
        (self.action)().await
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger").finish_non_exhaustive()
    }
}

/// Registry mapping interaction descriptions to triggers.
#[derive(Debug, Default)]
pub struct ScenarioRegistry {
    triggers: BTreeMap<String, Trigger>,
}

impl ScenarioRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an async trigger for a description.
    ///
    /// Registration fails fast: a duplicate description is a harness bug
    /// and is rejected here rather than at verification time.
    ///
    /// # Errors
    /// Returns [`VerifierError::DuplicateScenario`] when the description is
    /// already registered.
    pub fn register<F, Fut, M>(
        &mut self,
        description: impl Into<String>,
        action: F,
    ) -> VerifierResult<&mut Self>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<M>> + Send + 'static,
        M: IntoMessages,
    {
        let description = description.into();
        if self.triggers.contains_key(&description) {
            return Err(VerifierError::duplicate_scenario(description));
        }
        let action = Box::new(move || -> TriggerFuture {
            let fut = action();
            Box::pin(async move { fut.await.map(IntoMessages::into_messages) })
        });
        self.triggers.insert(description, Trigger { action });
        Ok(self)
    }

    /// Register a synchronous trigger for a description.
    ///
    /// # Errors
    /// Returns [`VerifierError::DuplicateScenario`] when the description is
    /// already registered.
    pub fn register_sync<F, M>(
        &mut self,
        description: impl Into<String>,
        action: F,
    ) -> VerifierResult<&mut Self>
    where
        F: Fn() -> anyhow::Result<M> + Send + Sync + 'static,
        M: IntoMessages,
    {
        self.register(description, move || {
            let result = action().map(IntoMessages::into_messages);
            async move { result }
        })
    }

    /// Find the trigger for a description.
    ///
    /// # Errors
    /// Returns [`VerifierError::UnregisteredScenario`] when no trigger is
    /// registered for the description.
    pub fn find(&self, description: &str) -> VerifierResult<&Trigger> {
        self.triggers
            .get(description)
            .ok_or_else(|| VerifierError::unregistered(description))
    }

    /// Whether a description is registered.
    #[must_use]
    pub fn contains(&self, description: &str) -> bool {
        self.triggers.contains_key(description)
    }

    /// Number of registered scenarios.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}
