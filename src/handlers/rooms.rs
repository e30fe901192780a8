use super::common::{
    created_response, map_service_error, message_response, success_response, validate_input,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::rooms::{CreateRoomRequest, UpdateRoomRequest},
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, put},
    Router,
};
use tracing::info;

/// List rooms
#[utoipa::path(
    get,
    path = "/api/rooms",
    responses(
        (status = 200, description = "All rooms; occupied rooms carry their live reservation id", body = serde_json::Value)
    ),
    tag = "rooms"
)]
pub async fn list_rooms(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rooms = state
        .services
        .rooms
        .list()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rooms))
}

/// Create a room
#[utoipa::path(
    post,
    path = "/api/rooms",
    request_body = CreateRoomRequest,
    responses(
        (status = 201, description = "Room created", body = serde_json::Value),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Room number already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "rooms"
)]
pub async fn create_room(
    State(state): State<AppState>,
    Json(payload): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let room = state
        .services
        .rooms
        .create(payload)
        .await
        .map_err(map_service_error)?;
    info!("Room created: {}", room.number);
    Ok(created_response(room))
}

/// Update a room
#[utoipa::path(
    put,
    path = "/api/rooms/{id}",
    params(("id" = i32, Path, description = "Room ID")),
    request_body = UpdateRoomRequest,
    responses(
        (status = 200, description = "Room updated", body = serde_json::Value),
        (status = 404, description = "Room not found", body = crate::errors::ErrorResponse)
    ),
    tag = "rooms"
)]
pub async fn update_room(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRoomRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let room = state
        .services
        .rooms
        .update(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(room))
}

/// Delete a room
#[utoipa::path(
    delete,
    path = "/api/rooms/{id}",
    params(("id" = i32, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room deleted", body = super::common::MessageResponse),
        (status = 404, description = "Room not found", body = crate::errors::ErrorResponse)
    ),
    tag = "rooms"
)]
pub async fn delete_room(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .rooms
        .delete(id)
        .await
        .map_err(map_service_error)?;
    info!("Room deleted: {}", id);
    Ok(message_response("Room deleted"))
}

pub fn rooms_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rooms).post(create_room))
        .route("/:id", put(update_room).delete(delete_room))
}
