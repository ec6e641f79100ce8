//! Scheduling release endpoints.
//!
//! - `POST /api/scheduling/release` — queue an appointment release
//! - `GET /api/scheduling/queue` — queue snapshot

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, DispatchAccepted, DispatchQuery};
use crate::dispatch::QueueSnapshot;
use crate::models::Appointment;

/// `POST /api/scheduling/release?confirm_resend=bool`
pub async fn release(
    State(ctx): State<ApiContext>,
    Query(query): Query<DispatchQuery>,
    Json(appointment): Json<Appointment>,
) -> Result<(StatusCode, Json<DispatchAccepted>), ApiError> {
    super::submit(&ctx.core, &ctx.core.scheduling, appointment, query.confirm_resend).await
}

/// `GET /api/scheduling/queue`
pub async fn queue(State(ctx): State<ApiContext>) -> Json<QueueSnapshot> {
    Json(ctx.core.scheduling.snapshot())
}
