use super::common::{
    created_response, map_service_error, message_response, success_response, validate_input,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::room_services::{CreateRoomServiceRequest, UpdateRoomServiceRequest},
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
    path = "/api/room-services",
    responses((status = 200, description = "Service requests, newest first", body = serde_json::Value)),
    tag = "room-services"
)]
pub async fn list_room_services(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let requests = state
        .services
        .room_requests
        .list()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(requests))
}

#[utoipa::path(
    get,
    path = "/api/room-services/room/{room_id}",
    params(("room_id" = i32, Path, description = "Room ID")),
    responses((status = 200, description = "Service requests for one room", body = serde_json::Value)),
    tag = "room-services"
)]
pub async fn list_room_services_for_room(
    State(state): State<AppState>,
    Path(room_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let requests = state
        .services
        .room_requests
        .list_for_room(room_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(requests))
}

/// Raise a room service, housekeeping or maintenance request
#[utoipa::path(
    post,
    path = "/api/room-services",
    request_body = CreateRoomServiceRequest,
    responses(
        (status = 201, description = "Request created", body = serde_json::Value),
        (status = 404, description = "Room not found", body = crate::errors::ErrorResponse)
    ),
    tag = "room-services"
)]
pub async fn create_room_service(
    State(state): State<AppState>,
    Json(payload): Json<CreateRoomServiceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let request = state
        .services
        .room_requests
        .create(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(request))
}

#[utoipa::path(
    put,
    path = "/api/room-services/{id}",
    params(("id" = i32, Path, description = "Service request ID")),
    request_body = UpdateRoomServiceRequest,
    responses(
        (status = 200, description = "Request updated", body = serde_json::Value),
        (status = 404, description = "Service request not found", body = crate::errors::ErrorResponse)
    ),
    tag = "room-services"
)]
pub async fn update_room_service(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRoomServiceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let request = state
        .services
        .room_requests
        .update(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(request))
}

#[utoipa::path(
    delete,
    path = "/api/room-services/{id}",
    params(("id" = i32, Path, description = "Service request ID")),
    responses(
        (status = 200, description = "Request cancelled", body = super::common::MessageResponse),
        (status = 404, description = "Service request not found", body = crate::errors::ErrorResponse)
    ),
    tag = "room-services"
)]
pub async fn cancel_room_service(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .room_requests
        .cancel(id)
        .await
        .map_err(map_service_error)?;
    info!(request_id = id, "Service request cancelled");
    Ok(message_response("Service request cancelled"))
}

pub fn room_services_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_room_services).post(create_room_service))
        .route("/room/:room_id", get(list_room_services_for_room))
        .route("/:id", put(update_room_service).delete(cancel_room_service))
}
