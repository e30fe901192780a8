use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::inventory_counts::{FinalizeCountRequest, StartCountRequest},
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, put},
    Router,
};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/inventory-counts",
    responses((status = 200, description = "Stock takes, newest first", body = serde_json::Value)),
    tag = "inventory-counts"
)]
pub async fn list_counts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let counts = state
        .services
        .inventory_counts
        .list()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(counts))
}

/// Snapshot current stock into a new count
#[utoipa::path(
    post,
    path = "/api/inventory-counts",
    request_body = StartCountRequest,
    responses((status = 201, description = "Count started", body = serde_json::Value)),
    tag = "inventory-counts"
)]
pub async fn start_count(
    State(state): State<AppState>,
    payload: Option<Json<StartCountRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    validate_input(&payload)?;
    let count = state
        .services
        .inventory_counts
        .start(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(count))
}

/// Record counted quantities and overwrite live stock with them
#[utoipa::path(
    put,
    path = "/api/inventory-counts/{id}/finalize",
    params(("id" = Uuid, Path, description = "Count ID")),
    request_body = FinalizeCountRequest,
    responses(
        (status = 200, description = "Count completed", body = serde_json::Value),
        (status = 400, description = "A count item has no counted quantity", body = crate::errors::ErrorResponse),
        (status = 404, description = "Count not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory-counts"
)]
pub async fn finalize_count(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FinalizeCountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let count = state
        .services
        .inventory_counts
        .finalize(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(count))
}

pub fn inventory_counts_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_counts).post(start_count))
        .route("/:id/finalize", put(finalize_count))
}
