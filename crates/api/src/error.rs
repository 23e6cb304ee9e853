//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checkout::CheckoutError;
use domain::DomainError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Domain logic error.
    Domain(DomainError),
    /// Checkout flow error.
    Checkout(CheckoutError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Checkout(err) => checkout_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    match &err {
        // Callers cannot tell a missing aggregate from a refused transition;
        // both answer 404 so the admin surface leaks nothing about current
        // state.
        DomainError::NotFound { .. }
        | DomainError::InvalidTransition { .. }
        | DomainError::ItemNotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        DomainError::Conflict { .. } => (StatusCode::CONFLICT, err.to_string()),
        DomainError::NoItems
        | DomainError::InvalidQuantity { .. }
        | DomainError::InvalidPrice { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        DomainError::Storage(_) | DomainError::Bus(_) => {
            tracing::error!(error = %err, "internal error answering request");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            )
        }
    }
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, String) {
    match err {
        CheckoutError::CartNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        CheckoutError::Availability(_) | CheckoutError::Payment(_) => {
            tracing::error!(error = %err, "checkout collaborator failed");
            (StatusCode::BAD_GATEWAY, err.to_string())
        }
        CheckoutError::Domain(err) => domain_error_to_response(err),
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Checkout(err)
    }
}
