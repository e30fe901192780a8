use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::{errors::ApiError, handlers::AppState, services::suppliers::CreateSupplierRequest};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use tracing::info;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/suppliers",
    responses((status = 200, description = "Suppliers by name", body = serde_json::Value)),
    tag = "suppliers"
)]
pub async fn list_suppliers(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let suppliers = state
        .services
        .suppliers
        .list()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(suppliers))
}

#[utoipa::path(
    get,
    path = "/api/suppliers/{id}",
    params(("id" = Uuid, Path, description = "Supplier ID")),
    responses(
        (status = 200, description = "Supplier", body = serde_json::Value),
        (status = 404, description = "Supplier not found", body = crate::errors::ErrorResponse)
    ),
    tag = "suppliers"
)]
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = state
        .services
        .suppliers
        .get(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(supplier))
}

#[utoipa::path(
    post,
    path = "/api/suppliers",
    request_body = CreateSupplierRequest,
    responses(
        (status = 201, description = "Supplier created", body = serde_json::Value),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "suppliers"
)]
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(payload): Json<CreateSupplierRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let supplier = state
        .services
        .suppliers
        .create(payload)
        .await
        .map_err(map_service_error)?;
    info!("Supplier created: {}", supplier.id);
    Ok(created_response(supplier))
}

pub fn suppliers_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route("/:id", get(get_supplier))
}
