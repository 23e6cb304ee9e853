//! Checkout endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use checkout::{CheckoutOutcome, CheckoutRequest, InsufficientProduct};
use common::{CourierId, UserId};
use domain::{Address, Contact};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct CheckoutRequestBody {
    /// Courier to hand the delivery to; assigned automatically when absent.
    pub courier_id: Option<Uuid>,
    pub note: Option<String>,
    pub contact: ContactRequest,
    pub address: AddressRequest,
}

#[derive(Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub phone: String,
}

#[derive(Deserialize)]
pub struct AddressRequest {
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

// -- Response types --

/// Both halves of the outcome answer 200; `success` discriminates. Partial
/// fulfillment is a user-readable failure, not a transport error.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_available: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unavailable: Vec<InsufficientProduct>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

impl From<CheckoutOutcome> for CheckoutResponse {
    fn from(outcome: CheckoutOutcome) -> Self {
        match outcome {
            CheckoutOutcome::Completed(success) => Self {
                success: true,
                all_available: Some(success.all_available),
                unavailable: success.unavailable,
                checkout_url: success.checkout_url,
                error: None,
                order_id: None,
            },
            CheckoutOutcome::Failed(failure) => Self {
                success: false,
                all_available: None,
                unavailable: Vec::new(),
                checkout_url: None,
                error: Some(failure.message().to_string()),
                order_id: Some(failure.order_id().to_string()),
            },
        }
    }
}

// -- Handlers --

/// POST /checkout/{user_id} — run one checkout attempt for the user's cart.
#[tracing::instrument(skip(state, req))]
pub async fn checkout(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<CheckoutRequestBody>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let request = CheckoutRequest {
        courier_id: req
            .courier_id
            .map(CourierId::from_uuid)
            .unwrap_or_default(),
        note: req.note,
        contact: Contact {
            name: req.contact.name,
            phone: req.contact.phone,
        },
        address: Address {
            street: req.address.street,
            city: req.address.city,
            postal_code: req.address.postal_code,
        },
    };

    let outcome = state
        .orchestrator
        .checkout(UserId::from_uuid(user_id), request)
        .await?;
    Ok(Json(outcome.into()))
}
