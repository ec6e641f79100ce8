//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::dispatch::{DispatchError, WorkflowKind};

/// Structured error response body for the frontend.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0} was already requested; confirm to resend")]
    ResendConfirmationRequired(String),
    #[error("Entity {0} already has a pending dispatch")]
    AlreadyQueued(String),
    #[error("{0} webhook is not configured")]
    WebhookNotConfigured(WorkflowKind),
    #[error("Dispatch queue is closed")]
    QueueClosed,
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::ResendConfirmationRequired(name) => (
                StatusCode::CONFLICT,
                "RESEND_CONFIRMATION_REQUIRED",
                format!("A request was already sent for {name}. Resend?"),
            ),
            ApiError::AlreadyQueued(id) => (
                StatusCode::CONFLICT,
                "ALREADY_QUEUED",
                format!("A dispatch for {id} is already pending"),
            ),
            ApiError::WebhookNotConfigured(workflow) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "WEBHOOK_NOT_CONFIGURED",
                format!("{workflow} webhook URL is not configured"),
            ),
            ApiError::QueueClosed => (
                StatusCode::SERVICE_UNAVAILABLE,
                "QUEUE_CLOSED",
                "Dispatch queue is shutting down".to_string(),
            ),
            ApiError::BadRequest(detail) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                detail.clone(),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::AlreadyInFlight(id) => ApiError::AlreadyQueued(id),
            DispatchError::QueueClosed => ApiError::QueueClosed,
            other => ApiError::Internal(other.to_string()),
        }
    }
}
