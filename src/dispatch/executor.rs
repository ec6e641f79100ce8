//! Webhook executor — one POST per dispatch, then a best-effort status
//! update against the primary backend.
//!
//! 1. Webhook URL must be configured (else `DispatchError::Config`)
//! 2. POST the payload as JSON
//! 3. Non-2xx → `DispatchError::Http`
//! 4. Lenient body parse (`{}` for empty / non-JSON)
//! 5. Mark the entity as requested; a failure here only downgrades the
//!    outcome to a warning

use std::marker::PhantomData;
use std::time::Duration;

use serde::Serialize;

use super::error::DispatchError;
use super::traits::{DispatchExecutor, Dispatchable, StatusUpdater};
use super::types::{DispatchOutcome, ServerAck};

/// Where one workflow sends its requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookTarget {
    /// `None` (or blank) means the deployment did not configure it.
    pub webhook_url: Option<String>,
    /// Backend resource path for the status update, e.g. `agendamentos`.
    pub status_resource: String,
}

impl WebhookTarget {
    pub fn configured_url(&self) -> Option<&str> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

pub struct WebhookExecutor<P, U> {
    target: WebhookTarget,
    client: reqwest::Client,
    timeout_secs: u64,
    updater: U,
    _payload: PhantomData<fn(&P)>,
}

impl<P, U> WebhookExecutor<P, U> {
    pub fn new(target: WebhookTarget, updater: U, timeout: Duration) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DispatchError::Config(format!("HTTP client: {e}")))?;

        Ok(Self {
            target,
            client,
            timeout_secs: timeout.as_secs(),
            updater,
            _payload: PhantomData,
        })
    }
}

impl<P, U> DispatchExecutor<P> for WebhookExecutor<P, U>
where
    P: Dispatchable + Serialize,
    U: StatusUpdater,
{
    async fn execute(&self, payload: &P) -> Result<DispatchOutcome, DispatchError> {
        let url = self
            .target
            .configured_url()
            .ok_or_else(|| DispatchError::Config("webhook URL is not configured".into()))?;

        let body = serde_json::to_vec(payload)
            .map_err(|e| DispatchError::Serialization(e.to_string()))?;

        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| DispatchError::from_reqwest(e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.unwrap_or_default();
        let ack = ServerAck::from_body(&body);

        let entity_id = payload.entity_id();
        let status_sync = self
            .updater
            .mark_requested(&self.target.status_resource, &entity_id)
            .await;
        if let Err(e) = &status_sync {
            tracing::warn!(
                entity_id = %entity_id,
                resource = %self.target.status_resource,
                error = %e,
                "Webhook sent but status update failed"
            );
        }

        Ok(DispatchOutcome { ack, status_sync })
    }
}
