use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::reservations::{CreateReservationRequest, UpdateReservationRequest},
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, put},
    Router,
};

/// Reservations, newest first, with their room
#[utoipa::path(
    get,
    path = "/api/reservations",
    responses((status = 200, description = "Reservations", body = serde_json::Value)),
    tag = "reservations"
)]
pub async fn list_reservations(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let reservations = state
        .services
        .reservations
        .list()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(reservations))
}

/// Book a room; the room is marked occupied
#[utoipa::path(
    post,
    path = "/api/reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = serde_json::Value),
        (status = 400, description = "Invalid dates", body = crate::errors::ErrorResponse),
        (status = 404, description = "Room not found", body = crate::errors::ErrorResponse)
    ),
    tag = "reservations"
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let reservation = state
        .services
        .reservations
        .create(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(reservation))
}

#[utoipa::path(
    put,
    path = "/api/reservations/{id}",
    params(("id" = i32, Path, description = "Reservation ID")),
    request_body = UpdateReservationRequest,
    responses(
        (status = 200, description = "Reservation updated", body = serde_json::Value),
        (status = 404, description = "Reservation not found", body = crate::errors::ErrorResponse)
    ),
    tag = "reservations"
)]
pub async fn update_reservation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateReservationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let reservation = state
        .services
        .reservations
        .update(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(reservation))
}

pub fn reservations_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reservations).post(create_reservation))
        .route("/:id", put(update_reservation))
}
