//! Checkout error types.

use common::UserId;
use domain::DomainError;
use thiserror::Error;

/// Errors surfaced by the checkout orchestrator and its collaborators.
///
/// Partial fulfillment is not an error: a chain whose delivery or payment leg
/// failed still yields a [`crate::CheckoutOutcome`]. Only a missing cart and
/// failures of the order leg itself abort a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No cart with at least one item exists for the user.
    #[error("no cart with items found for user {0}")]
    CartNotFound(UserId),

    /// The availability check itself could not be performed.
    #[error("availability check failed: {0}")]
    Availability(String),

    /// The payment provider refused or errored before returning a session.
    #[error("payment session creation failed: {0}")]
    Payment(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
