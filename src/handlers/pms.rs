use super::common::{map_service_error, success_response};
use crate::{errors::ApiError, handlers::AppState, services::pms::SyncResult};
use axum::{extract::State, response::IntoResponse, routing::post, Router};

/// Pull rooms from the property-management system
#[utoipa::path(
    post,
    path = "/api/pms/sync",
    responses(
        (status = 200, description = "Rooms upserted", body = SyncResult),
        (status = 502, description = "PMS request failed", body = crate::errors::ErrorResponse),
        (status = 503, description = "PMS not configured", body = crate::errors::ErrorResponse)
    ),
    tag = "pms"
)]
pub async fn sync_rooms(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .services
        .pms
        .sync_rooms()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(result))
}

pub fn pms_routes() -> Router<AppState> {
    Router::new().route("/sync", post(sync_rooms))
}
