//! Cart aggregate.
//!
//! The cart's lifecycle is owned by the checkout orchestrator; the domain
//! layer only defines the aggregate and its persistence seam.

mod entity;
mod repository;

pub use entity::Cart;
pub use repository::{CartRepository, InMemoryCartRepository};
