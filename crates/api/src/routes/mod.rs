//! HTTP route handlers.

pub mod carts;
pub mod checkout;
pub mod deliveries;
pub mod health;
pub mod metrics;
pub mod orders;
