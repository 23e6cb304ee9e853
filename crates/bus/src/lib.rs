//! Domain event bus for the fulfillment services.
//!
//! Publication is fire-and-forget: publishers never wait for consumers and
//! never learn whether anyone was listening. Delivery is at-least-once with
//! no ordering guarantee across event types; consumers must tolerate
//! duplicates and out-of-order arrival.

pub mod envelope;
pub mod error;
pub mod memory;

pub use envelope::{EventEnvelope, EventId};
pub use error::BusError;
pub use memory::InMemoryEventBus;

use async_trait::async_trait;

/// Publishing side of the event bus.
///
/// Lifecycle services publish through this trait so tests can swap in an
/// inspectable bus and production can swap in a broker-backed one.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes an event envelope to all current subscribers.
    async fn publish(&self, event: EventEnvelope) -> Result<(), BusError>;
}
