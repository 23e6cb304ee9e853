//! Bus error types.

use thiserror::Error;

/// Errors that can occur while publishing events.
#[derive(Debug, Error)]
pub enum BusError {
    /// The event could not be serialized into an envelope.
    #[error("event serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
