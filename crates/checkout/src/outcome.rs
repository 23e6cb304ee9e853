//! Checkout result classification.

use common::{OrderId, ProductId};
use serde::{Deserialize, Serialize};

/// A product the availability gate reported as under-stocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsufficientProduct {
    pub product_id: ProductId,
    pub title: String,
    pub quantity_in_stock: u32,
}

/// The success-shaped half of a checkout result.
///
/// `all_available = false` means the stock check stopped the attempt before
/// anything was created; the cart survives so the user can adjust quantities.
/// `all_available = true` means the full chain ran and `checkout_url` points
/// at the payment session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSuccess {
    pub all_available: bool,
    pub unavailable: Vec<InsufficientProduct>,
    pub checkout_url: Option<String>,
}

impl CheckoutSuccess {
    /// Shortage result: nothing was created, cart preserved.
    pub fn out_of_stock(unavailable: Vec<InsufficientProduct>) -> Self {
        Self {
            all_available: false,
            unavailable,
            checkout_url: None,
        }
    }

    /// Full success with a payment session to redirect to.
    pub fn with_checkout_url(checkout_url: String) -> Self {
        Self {
            all_available: true,
            unavailable: Vec::new(),
            checkout_url: Some(checkout_url),
        }
    }
}

/// Partial fulfillment: the order exists but a later leg of the chain did
/// not come back. The cart is gone either way; the order id lets operators
/// pick up the pieces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum FulfillmentFailure {
    DeliveryNotCreated { order_id: OrderId },
    PaymentCheckoutUrlNotCreated { order_id: OrderId },
    DeliveryAndPaymentCheckoutNotCreated { order_id: OrderId },
}

impl FulfillmentFailure {
    /// The order the failed checkout attempt created.
    pub fn order_id(&self) -> OrderId {
        match self {
            Self::DeliveryNotCreated { order_id }
            | Self::PaymentCheckoutUrlNotCreated { order_id }
            | Self::DeliveryAndPaymentCheckoutNotCreated { order_id } => *order_id,
        }
    }

    /// Client-actionable message, no internals leaked.
    pub fn message(&self) -> &'static str {
        match self {
            Self::DeliveryNotCreated { .. } => "order created but delivery not created",
            Self::PaymentCheckoutUrlNotCreated { .. } => {
                "order created but payment checkout url not created"
            }
            Self::DeliveryAndPaymentCheckoutNotCreated { .. } => {
                "order created but delivery and payment checkout not created"
            }
        }
    }

    /// Stable label used in metrics and API payloads.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DeliveryNotCreated { .. } => "delivery_not_created",
            Self::PaymentCheckoutUrlNotCreated { .. } => "payment_checkout_url_not_created",
            Self::DeliveryAndPaymentCheckoutNotCreated { .. } => {
                "delivery_and_payment_checkout_not_created"
            }
        }
    }
}

/// Exactly one of these comes back from every checkout attempt that did not
/// abort with an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutOutcome {
    Completed(CheckoutSuccess),
    Failed(FulfillmentFailure),
}

impl CheckoutOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}
