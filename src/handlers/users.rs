use super::common::{
    created_response, map_service_error, message_response, success_response, validate_input,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::users::{CreateUserRequest, UpdateUserRequest},
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, put},
    Router,
};
use tracing::info;

/// List staff accounts
#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, description = "Users without password hashes", body = serde_json::Value)),
    tag = "users"
)]
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state
        .services
        .users
        .list()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(users))
}

/// Create a staff account
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = serde_json::Value),
        (status = 400, description = "Missing fields", body = crate::errors::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let user = state
        .services
        .users
        .create(payload)
        .await
        .map_err(map_service_error)?;
    info!(user_id = user.id, "User created");
    Ok(created_response(user))
}

/// Update a staff account
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = serde_json::Value),
        (status = 404, description = "User not found", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let user = state
        .services
        .users
        .update(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(user))
}

/// Delete a staff account
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = super::common::MessageResponse),
        (status = 404, description = "User not found", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .users
        .delete(id)
        .await
        .map_err(map_service_error)?;
    info!(user_id = id, "User deleted");
    Ok(message_response("User deleted"))
}

pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", put(update_user).delete(delete_user))
}
