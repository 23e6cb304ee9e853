//! Delivery aggregate.

use chrono::{DateTime, Utc};
use common::{CourierId, DeliveryId, OrderId};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{Address, Contact};

use super::status::DeliveryStatus;

/// Input for creating a new delivery.
#[derive(Debug, Clone)]
pub struct NewDelivery {
    pub order_id: OrderId,
    pub courier_id: CourierId,
    pub contact: Contact,
    pub address: Address,
}

/// Delivery aggregate root.
///
/// Holds a back-reference to the order it serves as a plain identifier. The
/// delivered-at timestamp is set exactly once, when the status reaches
/// `Delivered`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    id: DeliveryId,
    order_id: OrderId,
    courier_id: CourierId,
    status: DeliveryStatus,
    delivered_at: Option<DateTime<Utc>>,
    contact: Contact,
    address: Address,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Delivery {
    /// Creates a new pending delivery.
    pub fn new(id: DeliveryId, delivery: NewDelivery) -> Self {
        let now = Utc::now();
        Self {
            id,
            order_id: delivery.order_id,
            courier_id: delivery.courier_id,
            status: DeliveryStatus::Pending,
            delivered_at: None,
            contact: delivery.contact,
            address: delivery.address,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a delivery from stored state.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: DeliveryId,
        order_id: OrderId,
        courier_id: CourierId,
        status: DeliveryStatus,
        delivered_at: Option<DateTime<Utc>>,
        contact: Contact,
        address: Address,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            order_id,
            courier_id,
            status,
            delivered_at,
            contact,
            address,
            created_at,
            updated_at,
        }
    }

    /// Advances the status, refusing any pair outside the transition graph.
    /// Reaching `Delivered` records the delivered-at timestamp.
    pub fn transition_to(&mut self, target: DeliveryStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::invalid_transition(
                "delivery",
                self.status,
                target,
            ));
        }
        self.status = target;
        self.updated_at = Utc::now();
        if target == DeliveryStatus::Delivered {
            self.delivered_at = Some(self.updated_at);
        }
        Ok(())
    }

    /// Reassigns the courier.
    pub fn assign_courier(&mut self, courier_id: CourierId) {
        self.courier_id = courier_id;
        self.updated_at = Utc::now();
    }

    pub fn id(&self) -> DeliveryId {
        self.id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn courier_id(&self) -> CourierId {
        self.courier_id
    }

    pub fn status(&self) -> DeliveryStatus {
        self.status
    }

    pub fn delivered_at(&self) -> Option<DateTime<Utc>> {
        self.delivered_at
    }

    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_delivery() -> Delivery {
        Delivery::new(
            DeliveryId::new(),
            NewDelivery {
                order_id: OrderId::new(),
                courier_id: CourierId::new(),
                contact: Contact {
                    name: "Jo Smith".to_string(),
                    phone: "+1 555 0100".to_string(),
                },
                address: Address {
                    street: "1 Main St".to_string(),
                    city: "Springfield".to_string(),
                    postal_code: "12345".to_string(),
                },
            },
        )
    }

    #[test]
    fn new_delivery_is_pending_without_timestamp() {
        let delivery = new_delivery();
        assert_eq!(delivery.status(), DeliveryStatus::Pending);
        assert!(delivery.delivered_at().is_none());
    }

    #[test]
    fn delivered_sets_timestamp_once() {
        let mut delivery = new_delivery();
        delivery.transition_to(DeliveryStatus::InProgress).unwrap();
        assert!(delivery.delivered_at().is_none());

        delivery.transition_to(DeliveryStatus::Delivered).unwrap();
        assert!(delivery.delivered_at().is_some());
    }

    #[test]
    fn refused_transition_leaves_state_untouched() {
        let mut delivery = new_delivery();
        let err = delivery.transition_to(DeliveryStatus::Delivered).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        assert_eq!(delivery.status(), DeliveryStatus::Pending);
        assert!(delivery.delivered_at().is_none());
    }

    #[test]
    fn cancel_from_pending_and_in_progress() {
        let mut delivery = new_delivery();
        delivery.transition_to(DeliveryStatus::Canceled).unwrap();
        assert_eq!(delivery.status(), DeliveryStatus::Canceled);

        let mut delivery = new_delivery();
        delivery.transition_to(DeliveryStatus::InProgress).unwrap();
        delivery.transition_to(DeliveryStatus::Canceled).unwrap();
        assert_eq!(delivery.status(), DeliveryStatus::Canceled);
    }
}
