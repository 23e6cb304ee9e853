//! Domain layer for the fulfillment services.
//!
//! Three aggregates, each owned by exactly one component:
//! - [`order::Order`], advanced by [`order::OrderService`] (the order
//!   lifecycle state machine),
//! - [`delivery::Delivery`], advanced by [`delivery::DeliveryService`],
//! - [`cart::Cart`], owned by the checkout orchestrator.
//!
//! Cross-aggregate reads (order completion checking the delivery status,
//! delivery cancellation resolving the order's owner) go through read-only
//! lookup seams and never mutate the other side.

pub mod cart;
pub mod delivery;
pub mod error;
pub mod events;
pub mod order;
pub mod value_objects;

pub use cart::{Cart, CartRepository, InMemoryCartRepository};
pub use delivery::{
    Delivery, DeliveryRepository, DeliveryService, DeliveryStatus, InMemoryDeliveryRepository,
    NewDelivery, OrderOwnerLookup, OrderOwnerSource,
};
pub use error::DomainError;
pub use events::FulfillmentEvent;
pub use order::{
    DeliveryStatusLookup, DeliveryStatusSource, InMemoryOrderRepository, InternalStatus, NewOrder,
    Order, OrderRepository, OrderService, OrderStatus,
};
pub use value_objects::{Address, Contact, LineItem};
