//! Domain events exchanged between the fulfillment services.

use bus::{BusError, EventEnvelope};
use chrono::{DateTime, Utc};
use common::{Money, OrderId, UserId};
use serde::{Deserialize, Serialize};

use crate::order::OrderStatus;

/// Events published on the fulfillment bus.
///
/// Delivery is at-least-once and unordered; consumers treat an
/// already-applied transition as a no-op rather than deduplicating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum FulfillmentEvent {
    /// An order was created by the checkout chain.
    OrderCreated {
        order_id: OrderId,
        user_id: UserId,
        total_price: Money,
        note: Option<String>,
        created_at: DateTime<Utc>,
    },

    /// An order's public status advanced.
    OrderStatusChanged {
        order_id: OrderId,
        user_id: UserId,
        new_status: OrderStatus,
        updated_at: DateTime<Utc>,
    },

    /// The payment provider confirmed payment for an order.
    OrderSuccessfullyPaid { order_id: OrderId },

    /// A delivery reached its terminal delivered state.
    DeliveryDelivered { order_id: OrderId },

    /// A delivery was canceled. The user id is resolved via a lookup to the
    /// order side and may be absent when that lookup fails; an absent user id
    /// means "cannot notify", not an error.
    DeliveryCanceled {
        order_id: OrderId,
        user_id: Option<UserId>,
    },
}

impl FulfillmentEvent {
    /// Returns the event type tag carried on the envelope.
    pub fn event_type(&self) -> &'static str {
        match self {
            FulfillmentEvent::OrderCreated { .. } => "OrderCreated",
            FulfillmentEvent::OrderStatusChanged { .. } => "OrderStatusChanged",
            FulfillmentEvent::OrderSuccessfullyPaid { .. } => "OrderSuccessfullyPaid",
            FulfillmentEvent::DeliveryDelivered { .. } => "DeliveryDelivered",
            FulfillmentEvent::DeliveryCanceled { .. } => "DeliveryCanceled",
        }
    }

    /// Wraps this event into a bus envelope.
    pub fn envelope(&self) -> Result<EventEnvelope, BusError> {
        EventEnvelope::new(self.event_type(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_roundtrip() {
        let event = FulfillmentEvent::DeliveryCanceled {
            order_id: OrderId::new(),
            user_id: Some(UserId::new()),
        };

        let envelope = event.envelope().unwrap();
        assert_eq!(envelope.event_type, "DeliveryCanceled");

        let decoded: FulfillmentEvent = serde_json::from_value(envelope.payload).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn event_type_tags() {
        let order_id = OrderId::new();
        assert_eq!(
            FulfillmentEvent::OrderSuccessfullyPaid { order_id }.event_type(),
            "OrderSuccessfullyPaid"
        );
        assert_eq!(
            FulfillmentEvent::DeliveryDelivered { order_id }.event_type(),
            "DeliveryDelivered"
        );
    }

    #[test]
    fn missing_user_id_survives_serialization() {
        let event = FulfillmentEvent::DeliveryCanceled {
            order_id: OrderId::new(),
            user_id: None,
        };
        let envelope = event.envelope().unwrap();
        let decoded: FulfillmentEvent = serde_json::from_value(envelope.payload).unwrap();
        assert_eq!(decoded, event);
    }
}
