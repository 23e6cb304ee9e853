//! Domain error types.

use bus::BusError;
use thiserror::Error;

/// Errors that can occur during domain operations.
///
/// `NotFound` and `InvalidTransition` are kept distinct here even though the
/// HTTP layer collapses them into one external signal; tests and operators
/// need to tell them apart.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The state machine refused the requested transition.
    #[error("invalid {entity} transition: {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    /// An entity with this identity already exists.
    #[error("{entity} already exists: {id}")]
    Conflict { entity: &'static str, id: String },

    /// The order or cart has no line items.
    #[error("no line items")]
    NoItems,

    /// The referenced line item is not present.
    #[error("line item not found: {product_id}")]
    ItemNotFound { product_id: String },

    /// Quantity must be greater than zero.
    #[error("invalid quantity: {quantity}")]
    InvalidQuantity { quantity: u32 },

    /// Unit price must be greater than zero.
    #[error("invalid unit price: {cents} cents")]
    InvalidPrice { cents: i64 },

    /// The backing store failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Publishing a domain event failed.
    #[error("event bus error: {0}")]
    Bus(#[from] BusError),
}

impl DomainError {
    /// Convenience constructor for not-found errors.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Convenience constructor for refused transitions.
    pub fn invalid_transition(
        entity: &'static str,
        from: impl ToString,
        to: impl ToString,
    ) -> Self {
        DomainError::InvalidTransition {
            entity,
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// A status string in storage did not match any known variant.
#[derive(Debug, Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);
