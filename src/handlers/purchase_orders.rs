use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::procurement::{
        PurchaseOrderRequest, ReceiveRequest, UpdateStatusRequest, VendorReturnRequest,
    },
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, patch, post},
    Router,
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

/// List purchase orders with supplier and lines
#[utoipa::path(
    get,
    path = "/api/purchase-orders",
    responses((status = 200, description = "Purchase orders", body = serde_json::Value)),
    tag = "purchase-orders"
)]
pub async fn list_purchase_orders(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let orders = state
        .services
        .procurement
        .list()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(orders))
}

/// Get a purchase order by ID
#[utoipa::path(
    get,
    path = "/api/purchase-orders/{id}",
    params(("id" = Uuid, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Purchase order fetched", body = serde_json::Value),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn get_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .procurement
        .get(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}

/// Create a new purchase order
#[utoipa::path(
    post,
    path = "/api/purchase-orders",
    request_body = PurchaseOrderRequest,
    responses(
        (status = 201, description = "Purchase order created", body = serde_json::Value),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Supplier or menu item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn create_purchase_order(
    State(state): State<AppState>,
    Json(payload): Json<PurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let order = state
        .services
        .procurement
        .create(payload)
        .await
        .map_err(map_service_error)?;
    info!("Purchase order created: {}", order.order.id);
    Ok(created_response(order))
}

/// Replace the lines of a purchase order and recompute its totals
#[utoipa::path(
    put,
    path = "/api/purchase-orders/{id}",
    params(("id" = Uuid, Path, description = "Purchase order ID")),
    request_body = PurchaseOrderRequest,
    responses(
        (status = 200, description = "Purchase order updated", body = serde_json::Value),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn update_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let order = state
        .services
        .procurement
        .update(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}

/// Set the status; moving to Completed books the full ordered quantities into stock
#[utoipa::path(
    patch,
    path = "/api/purchase-orders/{id}/status",
    params(("id" = Uuid, Path, description = "Purchase order ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = serde_json::Value),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn update_purchase_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .procurement
        .update_status(id, payload.status)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}

#[utoipa::path(
    patch,
    path = "/api/purchase-orders/{id}/approve",
    params(("id" = Uuid, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Purchase order approved", body = serde_json::Value),
        (status = 400, description = "Not pending approval", body = crate::errors::ErrorResponse),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn approve_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .procurement
        .approve(id)
        .await
        .map_err(map_service_error)?;
    info!("Purchase order approved: {}", id);
    Ok(success_response(order))
}

#[utoipa::path(
    patch,
    path = "/api/purchase-orders/{id}/reject",
    params(("id" = Uuid, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Purchase order rejected", body = serde_json::Value),
        (status = 400, description = "Not pending approval", body = crate::errors::ErrorResponse),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn reject_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .procurement
        .reject(id)
        .await
        .map_err(map_service_error)?;
    info!("Purchase order rejected: {}", id);
    Ok(success_response(order))
}

/// Record delivered quantities per line
#[utoipa::path(
    post,
    path = "/api/purchase-orders/{id}/receive",
    params(("id" = Uuid, Path, description = "Purchase order ID")),
    request_body = ReceiveRequest,
    responses(
        (status = 200, description = "Goods received", body = serde_json::Value),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn receive_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReceiveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .procurement
        .receive(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}

/// Send goods back to the supplier
#[utoipa::path(
    post,
    path = "/api/purchase-orders/{id}/vendor-return",
    params(("id" = Uuid, Path, description = "Purchase order ID")),
    request_body = VendorReturnRequest,
    responses(
        (status = 201, description = "Vendor return created", body = serde_json::Value),
        (status = 400, description = "No items to return", body = crate::errors::ErrorResponse),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn create_vendor_return(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VendorReturnRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let vendor_return = state
        .services
        .procurement
        .create_vendor_return(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(json!({
        "message": "Vendor return created",
        "vendorReturn": vendor_return,
    })))
}

#[utoipa::path(
    get,
    path = "/api/purchase-orders/{id}/vendor-returns",
    params(("id" = Uuid, Path, description = "Purchase order ID")),
    responses((status = 200, description = "Returns recorded against the order", body = serde_json::Value)),
    tag = "purchase-orders"
)]
pub async fn list_vendor_returns(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let returns = state
        .services
        .procurement
        .vendor_returns(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(returns))
}

pub fn purchase_orders_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_purchase_orders).post(create_purchase_order))
        .route("/:id", get(get_purchase_order).put(update_purchase_order))
        .route("/:id/status", patch(update_purchase_order_status))
        .route("/:id/approve", patch(approve_purchase_order))
        .route("/:id/reject", patch(reject_purchase_order))
        .route("/:id/receive", post(receive_purchase_order))
        .route("/:id/vendor-return", post(create_vendor_return))
        .route("/:id/vendor-returns", get(list_vendor_returns))
}
