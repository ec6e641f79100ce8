//! Receivable payment request endpoints.
//!
//! - `POST /api/receivables/payment-request` — queue a payment request
//! - `GET /api/receivables/queue` — queue snapshot

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, DispatchAccepted, DispatchQuery};
use crate::dispatch::QueueSnapshot;
use crate::models::ReceivablePaymentRequest;

/// `POST /api/receivables/payment-request?confirm_resend=bool`
pub async fn request_payment(
    State(ctx): State<ApiContext>,
    Query(query): Query<DispatchQuery>,
    Json(request): Json<ReceivablePaymentRequest>,
) -> Result<(StatusCode, Json<DispatchAccepted>), ApiError> {
    if !request.receivable.amount.is_finite() || request.receivable.amount <= 0.0 {
        return Err(ApiError::BadRequest(
            "Receivable amount must be greater than zero".into(),
        ));
    }
    super::submit(&ctx.core, &ctx.core.receivables, request, query.confirm_resend).await
}

/// `GET /api/receivables/queue`
pub async fn queue(State(ctx): State<ApiContext>) -> Json<QueueSnapshot> {
    Json(ctx.core.receivables.snapshot())
}
