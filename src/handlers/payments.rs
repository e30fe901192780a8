use super::common::{
    created_response, map_service_error, message_response, success_response, validate_input,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::{
        mpesa::{CallbackEnvelope, InitiatePaymentRequest},
        payments::{CreatePaymentRequest, UpdatePaymentRequest},
    },
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use serde_json::json;
use tracing::{info, warn};

#[utoipa::path(
    get,
    path = "/api/payments",
    responses((status = 200, description = "Payments with their order", body = serde_json::Value)),
    tag = "payments"
)]
pub async fn list_payments(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let payments = state
        .services
        .payments
        .list()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(payments))
}

/// Record a payment. A completed payment closes its order.
#[utoipa::path(
    post,
    path = "/api/payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = serde_json::Value),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "payments"
)]
pub async fn create_payment(
    State(state): State<AppState>,
    Json(payload): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let payment = state
        .services
        .payments
        .create(payload)
        .await
        .map_err(map_service_error)?;
    info!(payment_id = payment.id, order_id = payment.order_id, "Payment recorded");
    Ok(created_response(payment))
}

#[utoipa::path(
    put,
    path = "/api/payments/{id}",
    params(("id" = i32, Path, description = "Payment ID")),
    request_body = UpdatePaymentRequest,
    responses(
        (status = 200, description = "Payment updated", body = serde_json::Value),
        (status = 404, description = "Payment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "payments"
)]
pub async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let payment = state
        .services
        .payments
        .update(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(payment))
}

#[utoipa::path(
    delete,
    path = "/api/payments/{id}",
    params(("id" = i32, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment deleted", body = super::common::MessageResponse),
        (status = 404, description = "Payment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "payments"
)]
pub async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .payments
        .delete(id)
        .await
        .map_err(map_service_error)?;
    Ok(message_response("Payment deleted"))
}

/// Send an M-Pesa STK push to the customer's phone
#[utoipa::path(
    post,
    path = "/api/payments/mpesa/initiate",
    request_body = InitiatePaymentRequest,
    responses(
        (status = 200, description = "Gateway response, passed through", body = serde_json::Value),
        (status = 502, description = "Gateway rejected the request", body = crate::errors::ErrorResponse),
        (status = 503, description = "M-Pesa not configured", body = crate::errors::ErrorResponse)
    ),
    tag = "payments"
)]
pub async fn initiate_mpesa(
    State(state): State<AppState>,
    Json(payload): Json<InitiatePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let response = state
        .services
        .mpesa
        .initiate(payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(response))
}

/// Gateway webhook; always acknowledged so the gateway stops retrying
#[utoipa::path(
    post,
    path = "/api/payments/mpesa/callback",
    request_body = CallbackEnvelope,
    responses((status = 200, description = "Acknowledged", body = serde_json::Value)),
    tag = "payments"
)]
pub async fn mpesa_callback(
    State(state): State<AppState>,
    Json(payload): Json<CallbackEnvelope>,
) -> impl IntoResponse {
    if let Err(e) = state.services.mpesa.handle_callback(payload).await {
        warn!(error = %e, "M-Pesa callback could not be applied");
    }
    success_response(json!({ "status": "ok" }))
}

pub fn payments_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_payments).post(create_payment))
        .route("/:id", put(update_payment).delete(delete_payment))
        .route("/mpesa/initiate", post(initiate_mpesa))
        .route("/mpesa/callback", post(mpesa_callback))
}
