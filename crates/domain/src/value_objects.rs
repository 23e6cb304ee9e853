//! Value objects shared by the cart, order, and delivery aggregates.

use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A line item as it appears in a cart or frozen into an order.
///
/// The name and unit price are captured from the catalog at the time the
/// item is added; orders never re-derive them, so later catalog changes do
/// not affect existing orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// The product identifier.
    pub product_id: ProductId,

    /// Product name at capture time.
    pub product_name: String,

    /// Price per unit at capture time.
    pub unit_price: Money,

    /// Quantity ordered.
    pub quantity: u32,
}

impl LineItem {
    /// Creates a new line item.
    pub fn new(
        product_id: impl Into<ProductId>,
        product_name: impl Into<String>,
        unit_price: Money,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            unit_price,
            quantity,
        }
    }

    /// Validates quantity and price.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.quantity == 0 {
            return Err(DomainError::InvalidQuantity {
                quantity: self.quantity,
            });
        }
        if !self.unit_price.is_positive() {
            return Err(DomainError::InvalidPrice {
                cents: self.unit_price.cents(),
            });
        }
        Ok(())
    }

    /// Returns the total price for this line (quantity * unit price).
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Contact details captured for a delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
}

/// Shipping address snapshot captured for a delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_item_total_price() {
        let item = LineItem::new("SKU-001", "Widget", Money::from_cents(100), 2);
        assert_eq!(item.total_price().cents(), 200);
    }

    #[test]
    fn line_item_validation() {
        assert!(
            LineItem::new("SKU-001", "Widget", Money::from_cents(100), 1)
                .validate()
                .is_ok()
        );
        assert!(matches!(
            LineItem::new("SKU-001", "Widget", Money::from_cents(100), 0).validate(),
            Err(DomainError::InvalidQuantity { quantity: 0 })
        ));
        assert!(matches!(
            LineItem::new("SKU-001", "Widget", Money::zero(), 1).validate(),
            Err(DomainError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn line_item_serialization_roundtrip() {
        let item = LineItem::new("SKU-001", "Widget", Money::from_cents(999), 2);
        let json = serde_json::to_string(&item).unwrap();
        let deserialized: LineItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, deserialized);
    }
}
