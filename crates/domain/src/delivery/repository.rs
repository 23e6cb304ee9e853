//! Delivery repository trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{DeliveryId, OrderId};
use tokio::sync::RwLock;

use crate::error::DomainError;

use super::entity::Delivery;

/// Persistence seam for deliveries.
///
/// `find_by_order` serves the cross-service status lookup; each order has at
/// most one delivery.
#[async_trait]
pub trait DeliveryRepository: Send + Sync {
    async fn find(&self, id: DeliveryId) -> Result<Option<Delivery>, DomainError>;
    async fn find_by_order(&self, order_id: OrderId) -> Result<Option<Delivery>, DomainError>;
    async fn insert(&self, delivery: &Delivery) -> Result<(), DomainError>;
    async fn update(&self, delivery: &Delivery) -> Result<(), DomainError>;
    async fn delete(&self, id: DeliveryId) -> Result<(), DomainError>;
}

/// In-memory delivery repository for tests and local runs.
#[derive(Clone, Default)]
pub struct InMemoryDeliveryRepository {
    deliveries: Arc<RwLock<HashMap<DeliveryId, Delivery>>>,
}

impl InMemoryDeliveryRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored deliveries.
    pub async fn count(&self) -> usize {
        self.deliveries.read().await.len()
    }
}

#[async_trait]
impl DeliveryRepository for InMemoryDeliveryRepository {
    async fn find(&self, id: DeliveryId) -> Result<Option<Delivery>, DomainError> {
        Ok(self.deliveries.read().await.get(&id).cloned())
    }

    async fn find_by_order(&self, order_id: OrderId) -> Result<Option<Delivery>, DomainError> {
        Ok(self
            .deliveries
            .read()
            .await
            .values()
            .find(|d| d.order_id() == order_id)
            .cloned())
    }

    async fn insert(&self, delivery: &Delivery) -> Result<(), DomainError> {
        let mut deliveries = self.deliveries.write().await;
        if deliveries.contains_key(&delivery.id()) {
            return Err(DomainError::Conflict {
                entity: "delivery",
                id: delivery.id().to_string(),
            });
        }
        deliveries.insert(delivery.id(), delivery.clone());
        Ok(())
    }

    async fn update(&self, delivery: &Delivery) -> Result<(), DomainError> {
        let mut deliveries = self.deliveries.write().await;
        if !deliveries.contains_key(&delivery.id()) {
            return Err(DomainError::not_found("delivery", delivery.id()));
        }
        deliveries.insert(delivery.id(), delivery.clone());
        Ok(())
    }

    async fn delete(&self, id: DeliveryId) -> Result<(), DomainError> {
        let mut deliveries = self.deliveries.write().await;
        deliveries
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("delivery", id))
    }
}
