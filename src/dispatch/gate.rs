//! Resend confirmation gate — caller-side policy in front of `enqueue`.
//!
//! An entity already marked as requested is only queued again after the
//! confirmation callback approves it. Anything else is queued directly.

use std::future::Future;

use serde::Serialize;

use super::error::DispatchError;
use super::queue::SequentialDispatchQueue;
use super::traits::Dispatchable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    /// First request for this entity.
    Queued,
    /// Already requested before; the user confirmed the resend.
    ResendQueued,
    /// Already requested before; the user declined. Nothing was queued.
    Declined,
}

/// Queue `entity`, asking `confirm` first when it was already requested.
///
/// `confirm` receives the entity's display name and is not called for
/// first-time requests.
pub async fn request_dispatch<P, F, Fut>(
    queue: &SequentialDispatchQueue<P>,
    entity: P,
    confirm: F,
) -> Result<GateDecision, DispatchError>
where
    P: Dispatchable,
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = bool>,
{
    if !entity.is_already_requested() {
        queue.enqueue(entity)?;
        return Ok(GateDecision::Queued);
    }

    if !confirm(entity.display_name()).await {
        tracing::debug!(entity_id = %entity.entity_id(), "Resend declined");
        return Ok(GateDecision::Declined);
    }

    queue.enqueue(entity)?;
    Ok(GateDecision::ResendQueued)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::dispatch::notifications::NotificationFeed;
    use crate::dispatch::traits::DispatchExecutor;
    use crate::dispatch::types::{DispatchOutcome, QueueConfig, ServerAck, WorkflowKind};

    #[derive(Debug, Clone)]
    struct Record {
        id: &'static str,
        requested: bool,
    }

    impl Dispatchable for Record {
        fn entity_id(&self) -> String {
            self.id.to_string()
        }
        fn display_name(&self) -> String {
            format!("Patient {}", self.id)
        }
        fn is_already_requested(&self) -> bool {
            self.requested
        }
    }

    struct NoopExecutor;

    impl DispatchExecutor<Record> for NoopExecutor {
        async fn execute(&self, _payload: &Record) -> Result<DispatchOutcome, DispatchError> {
            Ok(DispatchOutcome::synced(ServerAck::empty()))
        }
    }

    fn queue() -> SequentialDispatchQueue<Record> {
        SequentialDispatchQueue::spawn(
            NoopExecutor,
            Arc::new(NotificationFeed::new()),
            QueueConfig::new(WorkflowKind::ReceivablePayment),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_entity_skips_confirmation() {
        let q = queue();
        let counter = AtomicUsize::new(0);
        let asked = &counter;

        let decision = request_dispatch(&q, Record { id: "a", requested: false }, |_| async move {
            asked.fetch_add(1, Ordering::SeqCst);
            false
        })
        .await
        .unwrap();

        assert_eq!(decision, GateDecision::Queued);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert!(q.is_in_flight("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn requested_entity_waits_for_confirmation() {
        let q = queue();
        let mut asked_for = None;

        let decision = request_dispatch(&q, Record { id: "b", requested: true }, |name| {
            asked_for = Some(name);
            async { false }
        })
        .await
        .unwrap();

        assert_eq!(decision, GateDecision::Declined);
        assert_eq!(asked_for.as_deref(), Some("Patient b"));
        assert!(!q.is_in_flight("b"));
        assert_eq!(q.pending_len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn confirmed_resend_is_queued() {
        let q = queue();

        let decision = request_dispatch(&q, Record { id: "c", requested: true }, |_| async { true })
            .await
            .unwrap();

        assert_eq!(decision, GateDecision::ResendQueued);
        assert!(q.is_in_flight("c"));
    }

    #[tokio::test(start_paused = true)]
    async fn queue_errors_propagate() {
        let q = queue();
        q.enqueue(Record { id: "d", requested: false }).unwrap();

        let err = request_dispatch(&q, Record { id: "d", requested: false }, |_| async { true })
            .await
            .unwrap_err();
        assert_eq!(err, DispatchError::AlreadyInFlight("d".into()));
    }
}
