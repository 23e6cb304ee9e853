//! Delivery aggregate and lifecycle service.

mod entity;
mod repository;
mod service;
mod status;

pub use entity::{Delivery, NewDelivery};
pub use repository::{DeliveryRepository, InMemoryDeliveryRepository};
pub use service::{DeliveryService, OrderOwnerLookup, OrderOwnerSource};
pub use status::DeliveryStatus;
