//! Dispatch API endpoints.
//!
//! Each workflow view has a submit endpoint (resend gate → queue) and a
//! queue snapshot endpoint. Notifications are polled by sequence number.

pub mod health;
pub mod notifications;
pub mod receivables;
pub mod scheduling;

use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::DispatchAccepted;
use crate::core_state::CoreState;
use crate::dispatch::{request_dispatch, Dispatchable, GateDecision, SequentialDispatchQueue};

/// Run one entity through the resend gate into `queue`.
///
/// The webhook URL is checked up front so a missing configuration is
/// reported once to the caller instead of failing inside the queue.
pub(crate) async fn submit<P: Dispatchable>(
    core: &CoreState,
    queue: &SequentialDispatchQueue<P>,
    entity: P,
    confirm_resend: bool,
) -> Result<(StatusCode, Json<DispatchAccepted>), ApiError> {
    let workflow = queue.workflow();
    if !core.is_configured(workflow) {
        return Err(ApiError::WebhookNotConfigured(workflow));
    }

    let entity_id = entity.entity_id();
    let label = entity.display_name();

    let decision = request_dispatch(queue, entity, |_| async move { confirm_resend }).await?;
    if decision == GateDecision::Declined {
        return Err(ApiError::ResendConfirmationRequired(label));
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(DispatchAccepted {
            entity_id,
            decision,
            queue: queue.snapshot(),
        }),
    ))
}
