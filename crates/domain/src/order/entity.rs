//! Order aggregate.

use chrono::{DateTime, Utc};
use common::{DeliveryId, Money, OrderId, UserId};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::LineItem;

use super::status::{InternalStatus, OrderStatus};

/// Input for creating a new order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub note: Option<String>,
    pub items: Vec<LineItem>,
}

/// Order aggregate root.
///
/// The item list is a frozen snapshot taken at checkout and the total is
/// derived from it once; neither changes after creation. Only the status,
/// internal status, note, and delivery link are mutable, and the status only
/// moves along the transition graph in [`OrderStatus`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    total_price: Money,
    status: OrderStatus,
    internal_status: InternalStatus,
    delivery_id: Option<DeliveryId>,
    note: Option<String>,
    items: Vec<LineItem>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new draft order, deriving the total from the item snapshot.
    pub fn new(id: OrderId, order: NewOrder) -> Result<Self, DomainError> {
        if order.items.is_empty() {
            return Err(DomainError::NoItems);
        }
        for item in &order.items {
            item.validate()?;
        }

        let total_price = order.items.iter().map(LineItem::total_price).sum();
        let now = Utc::now();

        Ok(Self {
            id,
            user_id: order.user_id,
            total_price,
            status: OrderStatus::Draft,
            internal_status: InternalStatus::Normal,
            delivery_id: None,
            note: order.note,
            items: order.items,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds an order from stored state.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: OrderId,
        user_id: UserId,
        total_price: Money,
        status: OrderStatus,
        internal_status: InternalStatus,
        delivery_id: Option<DeliveryId>,
        note: Option<String>,
        items: Vec<LineItem>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            total_price,
            status,
            internal_status,
            delivery_id,
            note,
            items,
            created_at,
            updated_at,
        }
    }

    /// Advances the status, refusing any pair outside the transition graph.
    /// State is untouched on refusal.
    pub fn transition_to(&mut self, target: OrderStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::invalid_transition(
                "order",
                self.status,
                target,
            ));
        }
        self.status = target;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Sets the operational flag. Not part of the public state machine.
    pub fn set_internal_status(&mut self, status: InternalStatus) {
        self.internal_status = status;
        self.updated_at = Utc::now();
    }

    /// Records the delivery serving this order. A back-reference, not
    /// ownership: the delivery row lives on the delivery side.
    pub fn link_delivery(&mut self, delivery_id: DeliveryId) {
        self.delivery_id = Some(delivery_id);
        self.updated_at = Utc::now();
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Total price derived from the item snapshot at creation.
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn internal_status(&self) -> InternalStatus {
        self.internal_status
    }

    pub fn delivery_id(&self) -> Option<DeliveryId> {
        self.delivery_id
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
