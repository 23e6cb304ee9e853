//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use api::AppState;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::UserId;
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup_with_state() -> (axum::Router, Arc<AppState>) {
    let (state, router) = api::create_default_state();
    tokio::spawn(router.run(state.bus.subscribe()));
    let app = api::create_app(state.clone(), get_metrics_handle(), Duration::from_secs(5));
    (app, state)
}

async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn checkout_body() -> serde_json::Value {
    serde_json::json!({
        "note": "leave at the door",
        "contact": { "name": "Jo Smith", "phone": "+1 555 0100" },
        "address": { "street": "1 Main St", "city": "Springfield", "postal_code": "12345" }
    })
}

async fn fill_cart(app: &axum::Router, state: &AppState, user_id: UserId) {
    let (status, _) = send(
        app,
        "POST",
        &format!("/carts/{user_id}/items"),
        Some(serde_json::json!({
            "product_id": "SKU-001",
            "product_name": "Widget",
            "unit_price_cents": 1000,
            "quantity": 2
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    state.availability.set_stock("SKU-001", 10);
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup_with_state();
    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _) = setup_with_state();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cart_lifecycle() {
    let (app, _) = setup_with_state();
    let user_id = UserId::new();

    // First access creates an empty cart.
    let (status, json) = send(&app, "GET", &format!("/carts/{user_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["items"].as_array().unwrap().len(), 0);

    let (status, json) = send(
        &app,
        "POST",
        &format!("/carts/{user_id}/items"),
        Some(serde_json::json!({
            "product_id": "SKU-001",
            "product_name": "Widget",
            "unit_price_cents": 1000,
            "quantity": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_cents"], 1000);

    let (status, json) = send(
        &app,
        "PUT",
        &format!("/carts/{user_id}/items/SKU-001"),
        Some(serde_json::json!({ "quantity": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_cents"], 3000);

    let (status, _) = send(&app, "DELETE", &format!("/carts/{user_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_zero_quantity_is_rejected() {
    let (app, _) = setup_with_state();
    let user_id = UserId::new();
    send(
        &app,
        "POST",
        &format!("/carts/{user_id}/items"),
        Some(serde_json::json!({
            "product_id": "SKU-001",
            "product_name": "Widget",
            "unit_price_cents": 1000,
            "quantity": 1
        })),
    )
    .await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/carts/{user_id}/items/SKU-001"),
        Some(serde_json::json!({ "quantity": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_checkout_happy_path() {
    let (app, state) = setup_with_state();
    let user_id = UserId::new();
    fill_cart(&app, &state, user_id).await;

    let (status, json) = send(
        &app,
        "POST",
        &format!("/checkout/{user_id}"),
        Some(checkout_body()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["allAvailable"], true);
    assert!(json["checkoutUrl"].as_str().is_some());

    // Cart is gone, the order exists.
    let (status, _) = send(&app, "POST", &format!("/checkout/{user_id}"), Some(checkout_body())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = send(&app, "GET", &format!("/users/{user_id}/orders"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["status"], "Created");
    assert_eq!(json[0]["total_cents"], 2000);
}

#[tokio::test]
async fn test_checkout_shortage_keeps_cart() {
    let (app, state) = setup_with_state();
    let user_id = UserId::new();
    fill_cart(&app, &state, user_id).await;
    state.availability.set_stock("SKU-001", 1);

    let (status, json) = send(
        &app,
        "POST",
        &format!("/checkout/{user_id}"),
        Some(checkout_body()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["allAvailable"], false);
    assert_eq!(json["unavailable"][0]["product_id"], "SKU-001");

    let (_, json) = send(&app, "GET", &format!("/carts/{user_id}"), None).await;
    assert_eq!(json["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_checkout_partial_failure_reports_reason() {
    let (app, state) = setup_with_state();
    let user_id = UserId::new();
    fill_cart(&app, &state, user_id).await;
    state.payments.set_fail_on_create(true);

    let (status, json) = send(
        &app,
        "POST",
        &format!("/checkout/{user_id}"),
        Some(checkout_body()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], false);
    assert_eq!(
        json["error"],
        "order created but payment checkout url not created"
    );
    assert!(json["orderId"].as_str().is_some());
}

#[tokio::test]
async fn test_checkout_without_cart_is_not_found() {
    let (app, _) = setup_with_state();
    let (status, _) = send(
        &app,
        "POST",
        &format!("/checkout/{}", UserId::new()),
        Some(checkout_body()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_status_commands() {
    let (app, state) = setup_with_state();
    let user_id = UserId::new();
    fill_cart(&app, &state, user_id).await;
    send(&app, "POST", &format!("/checkout/{user_id}"), Some(checkout_body())).await;

    let (_, orders) = send(&app, "GET", "/orders", None).await;
    let order_id = orders[0]["id"].as_str().unwrap().to_string();

    // Event-driven target refused, indistinguishable from not-found.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/orders/{order_id}/status"),
        Some(serde_json::json!({ "status": "Paid" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Unknown status text is a bad request, not a 404.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/orders/{order_id}/status"),
        Some(serde_json::json!({ "status": "Teleported" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Admin cancellation of a created order goes through.
    let (status, json) = send(
        &app,
        "PUT",
        &format!("/orders/{order_id}/status"),
        Some(serde_json::json!({ "status": "Cancelled" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "Cancelled");
}

#[tokio::test]
async fn test_internal_status_flag_and_triage_listing() {
    let (app, state) = setup_with_state();
    let user_id = UserId::new();
    fill_cart(&app, &state, user_id).await;
    send(&app, "POST", &format!("/checkout/{user_id}"), Some(checkout_body())).await;

    let (_, orders) = send(&app, "GET", "/orders", None).await;
    let order_id = orders[0]["id"].as_str().unwrap().to_string();

    let (status, json) = send(
        &app,
        "PUT",
        &format!("/orders/{order_id}/internal-status"),
        Some(serde_json::json!({ "internal_status": "DeliveryFailed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["internal_status"], "DeliveryFailed");

    let (status, json) = send(&app, "GET", "/orders/delivery-failed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["id"], order_id);
}

#[tokio::test]
async fn test_delivery_status_commands() {
    let (app, state) = setup_with_state();
    let user_id = UserId::new();
    fill_cart(&app, &state, user_id).await;
    send(&app, "POST", &format!("/checkout/{user_id}"), Some(checkout_body())).await;

    let (_, orders) = send(&app, "GET", "/orders", None).await;
    let delivery_id = orders[0]["delivery_id"].as_str().unwrap().to_string();

    let (status, json) = send(&app, "GET", &format!("/deliveries/{delivery_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "Pending");

    let (status, json) = send(
        &app,
        "PUT",
        &format!("/deliveries/{delivery_id}/status"),
        Some(serde_json::json!({ "status": "InProgress" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "InProgress");

    // Skipping a state is refused and answers like a missing delivery.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/deliveries/{delivery_id}/status"),
        Some(serde_json::json!({ "status": "Pending" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_order_is_not_found() {
    let (app, _) = setup_with_state();
    let (status, _) = send(
        &app,
        "GET",
        &format!("/orders/{}", uuid::Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
