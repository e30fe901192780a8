use super::common::{
    created_response, map_service_error, message_response, success_response, validate_input,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::inventory::{
        BulkUpdateRequest, BulkUpdateResult, CreateInventoryRequest, UpdateInventoryRequest,
    },
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, put},
    Router,
};
use tracing::info;

#[utoipa::path(
    get,
    path = "/api/inventory",
    responses((status = 200, description = "Stock rows", body = serde_json::Value)),
    tag = "inventory"
)]
pub async fn list_inventory(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .services
        .inventory
        .list()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(items))
}

/// Rows whose quantity is below their reorder threshold
#[utoipa::path(
    get,
    path = "/api/inventory/low-stock",
    responses((status = 200, description = "Low stock rows", body = serde_json::Value)),
    tag = "inventory"
)]
pub async fn low_stock(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .services
        .inventory
        .low_stock()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(items))
}

#[utoipa::path(
    get,
    path = "/api/inventory/{id}",
    params(("id" = i32, Path, description = "Inventory item ID")),
    responses(
        (status = 200, description = "Stock row", body = serde_json::Value),
        (status = 404, description = "Inventory item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn get_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .services
        .inventory
        .get(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(item))
}

#[utoipa::path(
    post,
    path = "/api/inventory",
    request_body = CreateInventoryRequest,
    responses(
        (status = 201, description = "Stock row created", body = serde_json::Value),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn create_inventory_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateInventoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let item = state
        .services
        .inventory
        .create(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(item))
}

/// Update a stock row; dropping below the threshold raises a warning notification
#[utoipa::path(
    put,
    path = "/api/inventory/{id}",
    params(("id" = i32, Path, description = "Inventory item ID")),
    request_body = UpdateInventoryRequest,
    responses(
        (status = 200, description = "Stock row updated", body = serde_json::Value),
        (status = 404, description = "Inventory item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn update_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateInventoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let item = state
        .services
        .inventory
        .update(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(item))
}

#[utoipa::path(
    delete,
    path = "/api/inventory/{id}",
    params(("id" = i32, Path, description = "Inventory item ID")),
    responses(
        (status = 200, description = "Stock row deleted", body = super::common::MessageResponse),
        (status = 404, description = "Inventory item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn delete_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .inventory
        .delete(id)
        .await
        .map_err(map_service_error)?;
    info!("Inventory item deleted: {}", id);
    Ok(message_response("Inventory item deleted"))
}

/// Apply field changes to several rows at once; unknown ids are skipped
#[utoipa::path(
    put,
    path = "/api/inventory/bulk",
    request_body = BulkUpdateRequest,
    responses(
        (status = 200, description = "Number of rows changed", body = BulkUpdateResult),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn bulk_update_inventory(
    State(state): State<AppState>,
    Json(payload): Json<BulkUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let result = state
        .services
        .inventory
        .bulk_update(payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(result))
}

pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_inventory).post(create_inventory_item))
        .route("/bulk", put(bulk_update_inventory))
        .route("/low-stock", get(low_stock))
        .route(
            "/:id",
            get(get_inventory_item)
                .put(update_inventory_item)
                .delete(delete_inventory_item),
        )
}
