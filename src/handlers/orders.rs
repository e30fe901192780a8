use super::common::{
    created_response, map_service_error, message_response, success_response, validate_input,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::orders::{CreateOrderRequest, Receipt, UpdateOrderRequest},
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use tracing::info;

/// Orders, newest first, with items and payments
#[utoipa::path(
    get,
    path = "/api/orders",
    responses((status = 200, description = "Orders", body = serde_json::Value)),
    tag = "orders"
)]
pub async fn list_orders(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let orders = state
        .services
        .orders
        .list()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(orders))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with items and payments", body = serde_json::Value),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .get(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}

/// Place an order; lines naming unknown menu items are dropped
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = serde_json::Value),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let order = state
        .services
        .orders
        .create(payload)
        .await
        .map_err(map_service_error)?;
    info!("Order created: {}", order.order.id);
    Ok(created_response(order))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    params(("id" = i32, Path, description = "Order ID")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = serde_json::Value),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let order = state
        .services
        .orders
        .update(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order deleted", body = super::common::MessageResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .orders
        .delete(id)
        .await
        .map_err(map_service_error)?;
    info!("Order deleted: {}", id);
    Ok(message_response("Order deleted"))
}

/// Printable receipt for an order
#[utoipa::path(
    get,
    path = "/api/orders/{id}/receipt",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Receipt", body = Receipt),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn order_receipt(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let receipt = state
        .services
        .orders
        .receipt(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(receipt))
}

pub fn orders_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/:id", get(get_order).put(update_order).delete(delete_order))
        .route("/:id/receipt", get(order_receipt))
}
