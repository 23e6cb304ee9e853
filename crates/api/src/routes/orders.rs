//! Order query and administrative command endpoints.

use std::str::FromStr;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::{OrderId, UserId};
use domain::{InternalStatus, Order, OrderStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct ChangeStatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct ChangeInternalStatusRequest {
    pub internal_status: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub user_id: String,
    pub total_cents: i64,
    pub status: String,
    pub internal_status: String,
    pub delivery_id: Option<String>,
    pub note: Option<String>,
    pub items: Vec<OrderItemResponse>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub product_name: String,
    pub unit_price_cents: i64,
    pub quantity: u32,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id().to_string(),
            user_id: order.user_id().to_string(),
            total_cents: order.total_price().cents(),
            status: order.status().to_string(),
            internal_status: order.internal_status().to_string(),
            delivery_id: order.delivery_id().map(|id| id.to_string()),
            note: order.note().map(str::to_string),
            items: order
                .items()
                .iter()
                .map(|item| OrderItemResponse {
                    product_id: item.product_id.to_string(),
                    product_name: item.product_name.clone(),
                    unit_price_cents: item.unit_price.cents(),
                    quantity: item.quantity,
                })
                .collect(),
            created_at: order.created_at(),
            updated_at: order.updated_at(),
        }
    }
}

fn to_responses(orders: Vec<Order>) -> Vec<OrderResponse> {
    orders.into_iter().map(OrderResponse::from).collect()
}

// -- Handlers --

/// GET /orders — all orders.
#[tracing::instrument(skip(state))]
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    Ok(Json(to_responses(state.orders.list().await?)))
}

/// GET /orders/delivery-failed — orders flagged for operator triage.
#[tracing::instrument(skip(state))]
pub async fn list_delivery_failed(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    Ok(Json(to_responses(
        state.orders.list_delivery_failed().await?,
    )))
}

/// GET /orders/{id} — one order.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.orders.get(OrderId::from_uuid(id)).await?;
    Ok(Json(order.into()))
}

/// GET /users/{user_id}/orders — the user's orders.
#[tracing::instrument(skip(state))]
pub async fn list_by_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    Ok(Json(to_responses(
        state.orders.list_by_user(UserId::from_uuid(user_id)).await?,
    )))
}

/// PUT /orders/{id}/status — administrative status change. Event-driven
/// targets are refused like any invalid transition.
#[tracing::instrument(skip(state, req))]
pub async fn change_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChangeStatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let target = OrderStatus::from_str(&req.status)
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;
    let order = state
        .orders
        .change_status(OrderId::from_uuid(id), target)
        .await?;
    Ok(Json(order.into()))
}

/// PUT /orders/{id}/internal-status — set the operational triage flag.
#[tracing::instrument(skip(state, req))]
pub async fn change_internal_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChangeInternalStatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let target = InternalStatus::from_str(&req.internal_status)
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;
    let order = state
        .orders
        .set_internal_status(OrderId::from_uuid(id), target)
        .await?;
    Ok(Json(order.into()))
}
