//! Trait seams of the dispatch pipeline.
//!
//! - Dispatchable: what an entity must expose to be queued
//! - DispatchExecutor: sends one payload to its webhook
//! - StatusUpdater: marks an entity as requested in the primary backend
//! - Notifier: receives user-facing notifications

use std::future::Future;

use super::error::{DispatchError, StatusSyncError};
use super::types::{DispatchOutcome, Notification};

/// A domain record that can be queued for dispatch.
pub trait Dispatchable: Clone + Send + Sync + 'static {
    /// Opaque identifier, unique among queued requests.
    fn entity_id(&self) -> String;

    /// Name shown in notifications (usually the patient).
    fn display_name(&self) -> String;

    /// True when a previous request was already sent for this record.
    fn is_already_requested(&self) -> bool;
}

/// Sends one payload. Called by a single consumer, never concurrently.
pub trait DispatchExecutor<P>: Send + Sync + 'static {
    fn execute(
        &self,
        payload: &P,
    ) -> impl Future<Output = Result<DispatchOutcome, DispatchError>> + Send;
}

/// Secondary update against the primary backend.
pub trait StatusUpdater: Send + Sync + 'static {
    fn mark_requested(
        &self,
        resource: &str,
        entity_id: &str,
    ) -> impl Future<Output = Result<(), StatusSyncError>> + Send;
}

/// Receives notifications. Must not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
