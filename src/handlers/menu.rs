use super::common::{
    created_response, map_service_error, message_response, success_response, validate_input,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::menu::{CreateMenuItemRequest, UpdateMenuItemRequest},
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, put},
    Router,
};
use tracing::info;

/// List menu items that have not been removed
#[utoipa::path(
    get,
    path = "/api/menu",
    responses((status = 200, description = "Menu items", body = serde_json::Value)),
    tag = "menu"
)]
pub async fn list_menu(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .services
        .menu
        .list()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(items))
}

#[utoipa::path(
    post,
    path = "/api/menu",
    request_body = CreateMenuItemRequest,
    responses(
        (status = 201, description = "Menu item created", body = serde_json::Value),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "menu"
)]
pub async fn create_menu_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateMenuItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let item = state
        .services
        .menu
        .create(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(item))
}

#[utoipa::path(
    put,
    path = "/api/menu/{id}",
    params(("id" = i32, Path, description = "Menu item ID")),
    request_body = UpdateMenuItemRequest,
    responses(
        (status = 200, description = "Menu item updated", body = serde_json::Value),
        (status = 404, description = "Menu item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "menu"
)]
pub async fn update_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateMenuItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let item = state
        .services
        .menu
        .update(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(item))
}

/// Soft delete: the item is hidden and marked unavailable
#[utoipa::path(
    delete,
    path = "/api/menu/{id}",
    params(("id" = i32, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Menu item removed", body = super::common::MessageResponse),
        (status = 404, description = "Menu item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "menu"
)]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .services
        .menu
        .delete(id)
        .await
        .map_err(map_service_error)?;
    info!("Menu item removed: {}", item.name);
    Ok(message_response("Menu item removed successfully"))
}

pub fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_menu).post(create_menu_item))
        .route("/:id", put(update_menu_item).delete(delete_menu_item))
}
