//! Shared types used across the fulfillment services.
//!
//! Cross-service references (an order pointing at its delivery, a delivery
//! pointing back at its order) are plain identifiers, never object graphs.
//! Each id is a distinct newtype so they cannot be mixed up at call sites.

pub mod types;

pub use types::{CourierId, DeliveryId, Money, OrderId, ProductId, UserId};
