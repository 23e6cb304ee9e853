//! External collaborators of the checkout flow.

pub mod availability;
pub mod payment;

pub use availability::{AvailabilityGate, InMemoryAvailabilityGate};
pub use payment::{InMemoryPaymentGateway, PaymentGateway};
