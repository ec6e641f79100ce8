//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;
use crate::dispatch::WorkflowKind;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub scheduling_configured: bool,
    pub receivables_configured: bool,
}

/// `GET /api/health` — liveness plus webhook configuration state.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        scheduling_configured: ctx.core.is_configured(WorkflowKind::SchedulingRelease),
        receivables_configured: ctx.core.is_configured(WorkflowKind::ReceivablePayment),
    })
}
