//! Primary backend client — the secondary "mark as requested" update.
//!
//! Issues `PUT {base}/{resource}/{id}` with `{"status": "SOLICITADO"}`.
//! Failures are returned as `StatusSyncError` and never retried.

use std::time::Duration;

use serde::Serialize;

use crate::dispatch::{StatusSyncError, StatusUpdater};
use crate::models::REQUESTED_STATUS;

#[derive(Serialize)]
struct StatusPatch<'a> {
    status: &'a str,
}

/// HTTP client for the clinic REST backend.
#[derive(Clone)]
pub struct BackendClient {
    base_url: Option<String>,
    token: Option<String>,
    client: reqwest::Client,
}

impl BackendClient {
    /// `base_url = None` makes every status update fail with `NotConfigured`.
    pub fn new(
        base_url: Option<&str>,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
            token: token.map(String::from),
            client,
        })
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// `{base}/{resource...}/{entity_id}`. The id is always one percent-encoded
    /// segment; `resource` may span several segments.
    fn entity_url(&self, resource: &str, entity_id: &str) -> Result<reqwest::Url, StatusSyncError> {
        let base = self.base_url.as_deref().ok_or(StatusSyncError::NotConfigured)?;
        if entity_id.is_empty() || entity_id == "." || entity_id == ".." {
            return Err(StatusSyncError::InvalidUrl(format!("invalid entity id {entity_id:?}")));
        }

        let mut url = reqwest::Url::parse(base)
            .map_err(|e| StatusSyncError::InvalidUrl(format!("{base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| StatusSyncError::InvalidUrl(format!("{base} cannot carry a path")))?
            .pop_if_empty()
            .extend(resource.split('/').filter(|s| !s.is_empty()))
            .push(entity_id);
        Ok(url)
    }
}

impl StatusUpdater for BackendClient {
    async fn mark_requested(&self, resource: &str, entity_id: &str) -> Result<(), StatusSyncError> {
        let url = self.entity_url(resource, entity_id)?;

        let mut request = self.client.put(url).json(&StatusPatch {
            status: REQUESTED_STATUS,
        });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StatusSyncError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StatusSyncError::Http(status.as_u16()));
        }

        tracing::debug!(resource, entity_id, "Backend status set to {REQUESTED_STATUS}");
        Ok(())
    }
}
