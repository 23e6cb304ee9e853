//! Cart repository trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::UserId;
use tokio::sync::RwLock;

use crate::error::DomainError;

use super::entity::Cart;

/// Persistence seam for carts, keyed by owning user. Inserting a second
/// cart for the same user is a conflict; this is what makes "at most one
/// live cart per user" hold.
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Cart>, DomainError>;
    async fn insert(&self, cart: &Cart) -> Result<(), DomainError>;
    async fn update(&self, cart: &Cart) -> Result<(), DomainError>;
    async fn delete_by_user(&self, user_id: UserId) -> Result<(), DomainError>;
}

/// In-memory cart repository for tests and local runs.
#[derive(Clone, Default)]
pub struct InMemoryCartRepository {
    carts: Arc<RwLock<HashMap<UserId, Cart>>>,
}

impl InMemoryCartRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live carts.
    pub async fn count(&self) -> usize {
        self.carts.read().await.len()
    }
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Cart>, DomainError> {
        Ok(self.carts.read().await.get(&user_id).cloned())
    }

    async fn insert(&self, cart: &Cart) -> Result<(), DomainError> {
        let mut carts = self.carts.write().await;
        if carts.contains_key(&cart.user_id()) {
            return Err(DomainError::Conflict {
                entity: "cart",
                id: cart.user_id().to_string(),
            });
        }
        carts.insert(cart.user_id(), cart.clone());
        Ok(())
    }

    async fn update(&self, cart: &Cart) -> Result<(), DomainError> {
        let mut carts = self.carts.write().await;
        if !carts.contains_key(&cart.user_id()) {
            return Err(DomainError::not_found("cart", cart.user_id()));
        }
        carts.insert(cart.user_id(), cart.clone());
        Ok(())
    }

    async fn delete_by_user(&self, user_id: UserId) -> Result<(), DomainError> {
        let mut carts = self.carts.write().await;
        carts
            .remove(&user_id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("cart", user_id))
    }
}
