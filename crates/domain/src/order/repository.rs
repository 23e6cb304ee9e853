//! Order repository trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{OrderId, UserId};
use tokio::sync::RwLock;

use crate::error::DomainError;

use super::entity::Order;
use super::status::InternalStatus;

/// Persistence seam for orders: find/insert/update/delete by id plus the
/// listing variants the admin surface needs.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find(&self, id: OrderId) -> Result<Option<Order>, DomainError>;
    async fn list(&self) -> Result<Vec<Order>, DomainError>;
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>, DomainError>;
    async fn list_by_internal_status(
        &self,
        status: InternalStatus,
    ) -> Result<Vec<Order>, DomainError>;
    async fn insert(&self, order: &Order) -> Result<(), DomainError>;
    async fn update(&self, order: &Order) -> Result<(), DomainError>;
    async fn delete(&self, id: OrderId) -> Result<(), DomainError>;
}

/// In-memory order repository for tests and local runs.
#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored orders.
    pub async fn count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Order>, DomainError> {
        let mut orders: Vec<Order> = self.orders.read().await.values().cloned().collect();
        orders.sort_by_key(Order::created_at);
        Ok(orders)
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>, DomainError> {
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .await
            .values()
            .filter(|o| o.user_id() == user_id)
            .cloned()
            .collect();
        orders.sort_by_key(Order::created_at);
        Ok(orders)
    }

    async fn list_by_internal_status(
        &self,
        status: InternalStatus,
    ) -> Result<Vec<Order>, DomainError> {
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .await
            .values()
            .filter(|o| o.internal_status() == status)
            .cloned()
            .collect();
        orders.sort_by_key(Order::created_at);
        Ok(orders)
    }

    async fn insert(&self, order: &Order) -> Result<(), DomainError> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id()) {
            return Err(DomainError::Conflict {
                entity: "order",
                id: order.id().to_string(),
            });
        }
        orders.insert(order.id(), order.clone());
        Ok(())
    }

    async fn update(&self, order: &Order) -> Result<(), DomainError> {
        let mut orders = self.orders.write().await;
        if !orders.contains_key(&order.id()) {
            return Err(DomainError::not_found("order", order.id()));
        }
        orders.insert(order.id(), order.clone());
        Ok(())
    }

    async fn delete(&self, id: OrderId) -> Result<(), DomainError> {
        let mut orders = self.orders.write().await;
        orders
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("order", id))
    }
}
