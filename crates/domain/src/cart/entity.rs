//! Cart aggregate.

use chrono::{DateTime, Utc};
use common::{Money, ProductId, UserId};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::LineItem;

/// Ephemeral cart, keyed by its owning user.
///
/// At most one live cart exists per user; the repository enforces the
/// uniqueness. A cart is created lazily on first access and deleted, never
/// just emptied, once a checkout attempt proceeds past the stock check —
/// its contents have been committed into an order by then, fully or
/// partially, and a surviving cart would risk duplicate fulfillment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    user_id: UserId,
    items: Vec<LineItem>,
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates an empty cart for a user.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Rebuilds a cart from stored state.
    pub fn restore(user_id: UserId, items: Vec<LineItem>, created_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            items,
            created_at,
        }
    }

    /// Adds an item, merging quantities when the product is already present.
    pub fn add_item(&mut self, item: LineItem) -> Result<(), DomainError> {
        item.validate()?;
        match self
            .items
            .iter_mut()
            .find(|existing| existing.product_id == item.product_id)
        {
            Some(existing) => existing.quantity += item.quantity,
            None => self.items.push(item),
        }
        Ok(())
    }

    /// Sets the quantity of an existing item.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> Result<(), DomainError> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity { quantity });
        }
        let item = self
            .items
            .iter_mut()
            .find(|item| &item.product_id == product_id)
            .ok_or_else(|| DomainError::ItemNotFound {
                product_id: product_id.to_string(),
            })?;
        item.quantity = quantity;
        Ok(())
    }

    /// Removes an item.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Result<(), DomainError> {
        let before = self.items.len();
        self.items.retain(|item| &item.product_id != product_id);
        if self.items.len() == before {
            return Err(DomainError::ItemNotFound {
                product_id: product_id.to_string(),
            });
        }
        Ok(())
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total price of all lines.
    pub fn total_price(&self) -> Money {
        self.items.iter().map(LineItem::total_price).sum()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
