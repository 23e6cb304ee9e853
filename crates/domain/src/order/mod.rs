//! Order aggregate and lifecycle service.

mod entity;
mod repository;
mod service;
mod status;

pub use entity::{NewOrder, Order};
pub use repository::{InMemoryOrderRepository, OrderRepository};
pub use service::{DeliveryStatusLookup, DeliveryStatusSource, OrderService};
pub use status::{InternalStatus, OrderStatus};
