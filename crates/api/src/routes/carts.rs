//! Cart endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{Money, UserId};
use domain::{Cart, LineItem};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
    pub product_name: String,
    pub unit_price_cents: i64,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: u32,
}

// -- Response types --

#[derive(Serialize)]
pub struct CartResponse {
    pub user_id: String,
    pub items: Vec<CartItemResponse>,
    pub total_cents: i64,
}

#[derive(Serialize)]
pub struct CartItemResponse {
    pub product_id: String,
    pub product_name: String,
    pub unit_price_cents: i64,
    pub quantity: u32,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            user_id: cart.user_id().to_string(),
            total_cents: cart.total_price().cents(),
            items: cart
                .items()
                .iter()
                .map(|item| CartItemResponse {
                    product_id: item.product_id.to_string(),
                    product_name: item.product_name.clone(),
                    unit_price_cents: item.unit_price.cents(),
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

// -- Handlers --

/// GET /carts/{user_id} — the user's cart, created empty on first access.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state.carts.get_or_create(UserId::from_uuid(user_id)).await?;
    Ok(Json(cart.into()))
}

/// POST /carts/{user_id}/items — add an item, merging quantities.
#[tracing::instrument(skip(state, req))]
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let item = LineItem::new(
        req.product_id.as_str(),
        req.product_name.as_str(),
        Money::from_cents(req.unit_price_cents),
        req.quantity,
    );
    let cart = state
        .carts
        .add_item(UserId::from_uuid(user_id), item)
        .await?;
    Ok(Json(cart.into()))
}

/// PUT /carts/{user_id}/items/{product_id} — replace a line's quantity.
#[tracing::instrument(skip(state, req))]
pub async fn set_quantity(
    State(state): State<Arc<AppState>>,
    Path((user_id, product_id)): Path<(Uuid, String)>,
    Json(req): Json<SetQuantityRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state
        .carts
        .set_quantity(UserId::from_uuid(user_id), &product_id.into(), req.quantity)
        .await?;
    Ok(Json(cart.into()))
}

/// DELETE /carts/{user_id}/items/{product_id} — remove a line.
#[tracing::instrument(skip(state))]
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path((user_id, product_id)): Path<(Uuid, String)>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state
        .carts
        .remove_item(UserId::from_uuid(user_id), &product_id.into())
        .await?;
    Ok(Json(cart.into()))
}

/// DELETE /carts/{user_id} — drop the whole cart.
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.carts.delete(UserId::from_uuid(user_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
