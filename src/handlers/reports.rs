use super::common::{map_service_error, success_response};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::reports::{DailyReport, SummaryQuery, SummaryReport},
};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};

/// Orders placed and money taken today (UTC)
#[utoipa::path(
    get,
    path = "/api/reports/daily",
    responses((status = 200, description = "Today's totals", body = DailyReport)),
    tag = "reports"
)]
pub async fn daily_report(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .services
        .reports
        .daily()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(report))
}

/// Sales summary for a named period or an explicit date range
#[utoipa::path(
    get,
    path = "/api/reports/summary",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Summary with per-day buckets and best sellers", body = SummaryReport),
        (status = 400, description = "Invalid period or missing range", body = crate::errors::ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn summary_report(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .services
        .reports
        .summary(query)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(report))
}

pub fn reports_routes() -> Router<AppState> {
    Router::new()
        .route("/daily", get(daily_report))
        .route("/summary", get(summary_report))
}
