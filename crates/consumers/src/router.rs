//! Event dispatch and the subscription loop.

use std::collections::HashMap;
use std::sync::Arc;

use bus::EventEnvelope;
use domain::FulfillmentEvent;
use tokio::sync::broadcast;

use crate::error::RouterError;

/// A registered reaction to one or more event types.
///
/// Handling must be idempotent by construction: the bus is at-least-once and
/// unordered, so a consumer will see duplicates and may see events before
/// the state they refer to. Transitions that no longer apply are no-ops.
#[async_trait::async_trait]
pub trait EventConsumer: Send + Sync {
    /// The event types this consumer reacts to.
    fn event_types(&self) -> &'static [&'static str];

    async fn handle(&self, event: &FulfillmentEvent) -> Result<(), RouterError>;
}

/// Routes bus envelopes to the consumers registered for their type.
#[derive(Clone, Default)]
pub struct FulfillmentEventRouter {
    consumers: HashMap<&'static str, Vec<Arc<dyn EventConsumer>>>,
}

impl FulfillmentEventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a consumer under every event type it declares.
    pub fn register(&mut self, consumer: Arc<dyn EventConsumer>) {
        for event_type in consumer.event_types() {
            self.consumers
                .entry(event_type)
                .or_default()
                .push(Arc::clone(&consumer));
        }
    }

    /// Dispatches one envelope. Unknown event types are skipped; a consumer
    /// error is logged and does not stop dispatch to the remaining
    /// consumers of the same event.
    #[tracing::instrument(skip(self, envelope), fields(event_type = %envelope.event_type, event_id = %envelope.event_id))]
    pub async fn dispatch(&self, envelope: &EventEnvelope) {
        let Some(consumers) = self.consumers.get(envelope.event_type.as_str()) else {
            tracing::debug!("no consumer registered, skipping");
            return;
        };

        let event: FulfillmentEvent = match serde_json::from_value(envelope.payload.clone()) {
            Ok(event) => event,
            Err(source) => {
                metrics::counter!("router_decode_failures_total").increment(1);
                tracing::warn!(error = %source, "undecodable event payload, skipping");
                return;
            }
        };

        for consumer in consumers {
            if let Err(err) = consumer.handle(&event).await {
                metrics::counter!("router_consumer_errors_total").increment(1);
                tracing::error!(error = %err, "event consumer failed");
            } else {
                metrics::counter!("router_events_handled_total").increment(1);
            }
        }
    }

    /// Consumes a broadcast subscription until the bus closes. Lagging
    /// behind the bus drops the missed events; with at-least-once semantics
    /// the producers may redeliver, and redelivery is already a no-op.
    pub async fn run(self, mut receiver: broadcast::Receiver<EventEnvelope>) {
        loop {
            match receiver.recv().await {
                Ok(envelope) => self.dispatch(&envelope).await,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    metrics::counter!("router_lagged_events_total").increment(missed);
                    tracing::warn!(missed, "event router lagged behind the bus");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("event bus closed, router stopping");
                    break;
                }
            }
        }
    }
}
