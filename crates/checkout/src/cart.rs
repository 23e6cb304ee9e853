//! Cart operations, owned by the checkout side.

use common::{ProductId, UserId};
use domain::{Cart, CartRepository, DomainError, LineItem};

/// Cart use cases over a [`CartRepository`].
///
/// Carts come into existence lazily: any item operation on a user without a
/// cart creates one first. Deletion is the orchestrator's compensating step
/// and also an explicit user operation.
#[derive(Clone)]
pub struct CartService<R> {
    repo: R,
}

impl<R: CartRepository> CartService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Loads the user's cart, creating an empty one when none exists.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, DomainError> {
        if let Some(cart) = self.repo.find_by_user(user_id).await? {
            return Ok(cart);
        }
        let cart = Cart::new(user_id);
        match self.repo.insert(&cart).await {
            Ok(()) => Ok(cart),
            // Lost a create race; the cart that won is the live one.
            Err(DomainError::Conflict { .. }) => self
                .repo
                .find_by_user(user_id)
                .await?
                .ok_or_else(|| DomainError::not_found("cart", user_id)),
            Err(err) => Err(err),
        }
    }

    /// Adds an item, merging quantities on an existing line.
    #[tracing::instrument(skip(self, item), fields(product_id = %item.product_id))]
    pub async fn add_item(&self, user_id: UserId, item: LineItem) -> Result<Cart, DomainError> {
        let mut cart = self.get_or_create(user_id).await?;
        cart.add_item(item)?;
        self.repo.update(&cart).await?;
        Ok(cart)
    }

    /// Replaces the quantity of an existing line.
    #[tracing::instrument(skip(self))]
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Cart, DomainError> {
        let mut cart = self.get(user_id).await?;
        cart.set_quantity(product_id, quantity)?;
        self.repo.update(&cart).await?;
        Ok(cart)
    }

    /// Removes a line.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item(
        &self,
        user_id: UserId,
        product_id: &ProductId,
    ) -> Result<Cart, DomainError> {
        let mut cart = self.get(user_id).await?;
        cart.remove_item(product_id)?;
        self.repo.update(&cart).await?;
        Ok(cart)
    }

    /// Loads the user's cart, `None` becoming a not-found error.
    pub async fn get(&self, user_id: UserId) -> Result<Cart, DomainError> {
        self.repo
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("cart", user_id))
    }

    /// Deletes the user's cart.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, user_id: UserId) -> Result<(), DomainError> {
        self.repo.delete_by_user(user_id).await
    }
}
