//! In-process event bus implementation.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::sync::broadcast;

use crate::envelope::EventEnvelope;
use crate::error::BusError;
use crate::EventPublisher;

const DEFAULT_CAPACITY: usize = 256;

/// In-process event bus built on a tokio broadcast channel.
///
/// Every subscriber sees every event published after it subscribed. A slow
/// subscriber that falls more than the channel capacity behind loses the
/// oldest events (the receiver observes a lag, not an error on this side).
/// All published envelopes are additionally retained in a log so tests can
/// assert on exactly what was emitted.
#[derive(Clone)]
pub struct InMemoryEventBus {
    tx: broadcast::Sender<EventEnvelope>,
    published: Arc<RwLock<Vec<EventEnvelope>>>,
}

impl InMemoryEventBus {
    /// Creates a new bus with the default channel capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a new bus with the given channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            published: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Subscribes to all events published from this point on.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.tx.subscribe()
    }

    /// Returns a copy of every envelope published so far.
    pub async fn published(&self) -> Vec<EventEnvelope> {
        self.published.read().await.clone()
    }

    /// Returns the number of envelopes published so far.
    pub async fn published_count(&self) -> usize {
        self.published.read().await.len()
    }

    /// Returns the published envelopes with the given type tag.
    pub async fn published_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.published
            .read()
            .await
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), BusError> {
        self.published.write().await.push(event.clone());

        // A send error only means there are no subscribers right now, which
        // is fine for fire-and-forget publication.
        if self.tx.send(event).is_err() {
            tracing::trace!("event published with no active subscribers");
        }

        Ok(())
    }
}
