use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Bad Request",
    "message": "Only POs pending approval can be approved.",
    "request_id": "5f0c6d1e-3b1a-4f43-9d59-0c1b8e1f7a42",
    "timestamp": "2026-03-01T08:15:00+00:00"
}))]
pub struct ErrorResponse {
    /// Reason phrase of the HTTP status
    #[schema(example = "Bad Request")]
    pub error: String,
    pub message: String,
    /// Field-level validation output, when there is any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Echo of the `x-request-id` header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ErrorResponse {
    fn new(status: StatusCode, message: String) -> Self {
        Self {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
            details: None,
            request_id: crate::tracing::current_request_id().map(|id| id.0),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn with_details(mut self, details: String) -> Self {
        self.details = Some(details);
        self
    }

    fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Failures raised by the service layer
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A workflow rule was broken, e.g. approving a draft purchase order
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// M-Pesa or the PMS answered with an error or could not be reached
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// An integration is switched off by configuration
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Hash error: {0}")]
    HashError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::ExternalServiceError(err.to_string())
    }
}

impl ServiceError {
    /// For `map_err` on sea-orm calls.
    pub fn db_error(err: DbErr) -> Self {
        ServiceError::DatabaseError(err)
    }

    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        ServiceError::NotFound(format!("{} {} not found", entity, id))
    }

    pub fn status_code(&self) -> StatusCode {
        use ServiceError::*;
        match self {
            NotFound(_) => StatusCode::NOT_FOUND,
            ValidationError(_) | InvalidOperation(_) => StatusCode::BAD_REQUEST,
            Conflict(_) => StatusCode::CONFLICT,
            ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
            ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            DatabaseError(_) | HashError(_) | InternalError(_) | Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Text shown to the client. Server-side failures are not echoed.
    pub fn response_message(&self) -> String {
        use ServiceError::*;
        match self {
            DatabaseError(_) => "Database error".to_string(),
            HashError(_) | InternalError(_) | Other(_) => "Internal server error".to_string(),
            NotFound(msg) | ValidationError(msg) | InvalidOperation(msg) | Conflict(msg)
            | ServiceUnavailable(msg) => msg.clone(),
            ExternalServiceError(_) => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        ErrorResponse::new(status, self.response_message()).into_response_with(status)
    }
}

/// Error type returned by HTTP handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Service error: {0}")]
    ServiceError(#[from] ServiceError),

    /// Request body failed `validator` checks
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::ServiceError(err) => err.into_response(),
            ApiError::ValidationError(details) => {
                ErrorResponse::new(StatusCode::BAD_REQUEST, "Validation failed".to_string())
                    .with_details(details)
                    .into_response_with(StatusCode::BAD_REQUEST)
            }
        }
    }
}
