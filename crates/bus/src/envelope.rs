//! Event envelope carried on the bus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BusError;

/// Unique identifier for a published event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random event ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A domain event as it travels on the bus.
///
/// The payload is the JSON serialization of the typed event; the type tag
/// lets consumers skip events they do not understand without deserializing
/// the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique id of this publication.
    pub event_id: EventId,

    /// Event type tag, e.g. `"OrderStatusChanged"`.
    pub event_type: String,

    /// JSON payload of the typed event.
    pub payload: serde_json::Value,

    /// When the event was published.
    pub published_at: DateTime<Utc>,
}

impl EventEnvelope {
    /// Wraps a serializable event into an envelope.
    pub fn new(event_type: impl Into<String>, event: &impl Serialize) -> Result<Self, BusError> {
        Ok(Self {
            event_id: EventId::new(),
            event_type: event_type.into(),
            payload: serde_json::to_value(event)?,
            published_at: Utc::now(),
        })
    }
}
