//! Router error types.

use domain::DomainError;
use thiserror::Error;

/// Errors a consumer can surface to the router.
///
/// Invalid transitions and missing aggregates never reach this type; the
/// consumers swallow those as no-ops, which is what makes redelivery safe.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("failed to decode {event_type} payload: {source}")]
    Decode {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("notification dispatch failed: {0}")]
    Notify(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
