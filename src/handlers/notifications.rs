use super::common::{
    created_response, map_service_error, message_response, success_response, validate_input,
};
use crate::{
    errors::ApiError, handlers::AppState,
    services::notifications::CreateNotificationRequest,
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{delete, get, put},
    Router,
};
use tracing::info;

#[utoipa::path(
    get,
    path = "/api/notifications",
    responses((status = 200, description = "Notifications, newest first", body = serde_json::Value)),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let notifications = state
        .services
        .notifications
        .list()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(notifications))
}

#[utoipa::path(
    post,
    path = "/api/notifications",
    request_body = CreateNotificationRequest,
    responses(
        (status = 201, description = "Notification created", body = serde_json::Value),
        (status = 400, description = "type and message required", body = crate::errors::ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn create_notification(
    State(state): State<AppState>,
    Json(payload): Json<CreateNotificationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let notification = state
        .services
        .notifications
        .create(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(notification))
}

#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    params(("id" = i32, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Marked read", body = serde_json::Value),
        (status = 404, description = "Notification not found", body = crate::errors::ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let notification = state
        .services
        .notifications
        .mark_read(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(notification))
}

#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(("id" = i32, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification deleted", body = super::common::MessageResponse),
        (status = 404, description = "Notification not found", body = crate::errors::ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .notifications
        .delete(id)
        .await
        .map_err(map_service_error)?;
    Ok(message_response("Notification deleted"))
}

#[utoipa::path(
    delete,
    path = "/api/notifications",
    responses((status = 200, description = "Feed cleared", body = super::common::MessageResponse)),
    tag = "notifications"
)]
pub async fn delete_all_notifications(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = state
        .services
        .notifications
        .delete_all()
        .await
        .map_err(map_service_error)?;
    info!(removed, "Notifications cleared");
    Ok(message_response("All notifications deleted"))
}

pub fn notifications_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_notifications)
                .post(create_notification)
                .delete(delete_all_notifications),
        )
        .route("/:id/read", put(mark_notification_read))
        .route("/:id", delete(delete_notification))
}
