//! Delivery query and administrative command endpoints.

use std::str::FromStr;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::DeliveryId;
use domain::{Delivery, DeliveryStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChangeStatusRequest {
    pub status: String,
}

#[derive(Serialize)]
pub struct DeliveryResponse {
    pub id: String,
    pub order_id: String,
    pub courier_id: String,
    pub status: String,
    pub delivered_at: Option<chrono::DateTime<chrono::Utc>>,
    pub contact_name: String,
    pub contact_phone: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

impl From<Delivery> for DeliveryResponse {
    fn from(delivery: Delivery) -> Self {
        Self {
            id: delivery.id().to_string(),
            order_id: delivery.order_id().to_string(),
            courier_id: delivery.courier_id().to_string(),
            status: delivery.status().to_string(),
            delivered_at: delivery.delivered_at(),
            contact_name: delivery.contact().name.clone(),
            contact_phone: delivery.contact().phone.clone(),
            street: delivery.address().street.clone(),
            city: delivery.address().city.clone(),
            postal_code: delivery.address().postal_code.clone(),
        }
    }
}

/// GET /deliveries/{id} — one delivery.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeliveryResponse>, ApiError> {
    let delivery = state.deliveries.get(DeliveryId::from_uuid(id)).await?;
    Ok(Json(delivery.into()))
}

/// PUT /deliveries/{id}/status — advance the delivery state machine.
#[tracing::instrument(skip(state, req))]
pub async fn change_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChangeStatusRequest>,
) -> Result<Json<DeliveryResponse>, ApiError> {
    let target = DeliveryStatus::from_str(&req.status)
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;
    let delivery = state
        .deliveries
        .change_status(DeliveryId::from_uuid(id), target)
        .await?;
    Ok(Json(delivery.into()))
}
