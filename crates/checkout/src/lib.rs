//! Checkout orchestration.
//!
//! One checkout attempt runs a stock check, then the order-creation chain
//! (order, delivery, payment session), then classifies the result by which
//! chain legs came back. The single compensating action of the whole system
//! lives here: cart deletion after any attempt that passed the stock check.

pub mod cart;
pub mod chain;
pub mod error;
pub mod orchestrator;
pub mod outcome;
pub mod services;

pub use cart::CartService;
pub use chain::{
    ChainReceipt, ChainRequest, DeliveryCreation, FulfillmentChain, OrderCreation,
    OrderCreationChain,
};
pub use error::CheckoutError;
pub use orchestrator::{CheckoutOrchestrator, CheckoutRequest};
pub use outcome::{CheckoutOutcome, CheckoutSuccess, FulfillmentFailure, InsufficientProduct};
pub use services::{
    AvailabilityGate, InMemoryAvailabilityGate, InMemoryPaymentGateway, PaymentGateway,
};
