//! Sequential dispatch queue — FIFO, one dispatch at a time, with a
//! minimum spacing between enqueue and send.
//!
//! A single consumer task owns the processing loop. Callers only append
//! (`enqueue`) and observe (`snapshot`, `is_in_flight`). The spacing is
//! measured from each request's own enqueue instant, not from the end of
//! the previous dispatch: a request that already waited behind slower
//! entries is sent without any extra delay.

use std::collections::{HashSet, VecDeque};
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};

use futures_util::FutureExt;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::error::DispatchError;
use super::traits::{DispatchExecutor, Dispatchable, Notifier};
use super::types::{
    DispatchOutcome, DispatchRequest, Notification, NotificationLevel, QueueConfig,
    QueueSnapshot, WorkflowKind,
};

// ═══════════════════════════════════════════════════════════
// Shared state
// ═══════════════════════════════════════════════════════════

struct QueueState<P> {
    pending: VecDeque<DispatchRequest<P>>,
    in_flight: HashSet<String>,
    is_dispatching: bool,
    closed: bool,
}

impl<P> QueueState<P> {
    fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            in_flight: HashSet::new(),
            is_dispatching: false,
            closed: false,
        }
    }
}

enum Next<P> {
    Dispatch(DispatchRequest<P>),
    Idle,
    Closed,
}

struct Shared<P> {
    state: Mutex<QueueState<P>>,
    wake: Notify,
    notifier: Arc<dyn Notifier>,
    config: QueueConfig,
}

impl<P: Clone> Shared<P> {
    /// Claim the head for processing. Leaves it in `pending` until done.
    fn begin_next(&self) -> Next<P> {
        let Ok(mut state) = self.state.lock() else {
            return Next::Closed;
        };
        if state.closed {
            return Next::Closed;
        }
        if state.is_dispatching {
            return Next::Idle;
        }
        match state.pending.front().cloned() {
            Some(head) => {
                state.is_dispatching = true;
                Next::Dispatch(head)
            }
            None => Next::Idle,
        }
    }

    /// Pop the head and clear its marker. Returns how many remain, or
    /// `None` when the queue was torn down meanwhile.
    fn finish_head(&self, entity_id: &str) -> Option<usize> {
        let Ok(mut state) = self.state.lock() else {
            return None;
        };
        if state.closed {
            return None;
        }
        if let Some(head) = state.pending.pop_front() {
            debug_assert_eq!(head.entity_id, entity_id);
        }
        state.in_flight.remove(entity_id);
        state.is_dispatching = false;
        Some(state.pending.len())
    }

    fn is_closed(&self) -> bool {
        self.state.lock().map(|s| s.closed).unwrap_or(true)
    }

    fn notify(&self, level: NotificationLevel, request: &DispatchRequest<P>, message: String) {
        self.notifier.notify(Notification::new(
            level,
            self.config.workflow,
            &request.entity_id,
            &request.label,
            message,
        ));
    }

    fn report(&self, request: &DispatchRequest<P>, result: Result<DispatchOutcome, DispatchError>) {
        let workflow = self.config.workflow;
        match result {
            Ok(outcome) => match outcome.status_sync {
                Ok(()) => self.notify(
                    NotificationLevel::Success,
                    request,
                    format!("{workflow} sent for {}: {}", request.label, outcome.ack.message()),
                ),
                Err(sync_err) => self.notify(
                    NotificationLevel::Warning,
                    request,
                    format!(
                        "{workflow} sent for {}, but the local status was not updated: {sync_err}",
                        request.label
                    ),
                ),
            },
            Err(err) => self.notify(
                NotificationLevel::Error,
                request,
                format!("{workflow} failed for {}: {err}", request.label),
            ),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// SequentialDispatchQueue
// ═══════════════════════════════════════════════════════════

/// Per-view dispatch queue. Dropping it tears it down.
pub struct SequentialDispatchQueue<P> {
    shared: Arc<Shared<P>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl<P: Dispatchable> SequentialDispatchQueue<P> {
    /// Start the consumer task. Must be called inside a tokio runtime.
    pub fn spawn<E>(executor: E, notifier: Arc<dyn Notifier>, config: QueueConfig) -> Self
    where
        E: DispatchExecutor<P>,
    {
        let shared = Arc::new(Shared {
            state: Mutex::new(QueueState::new()),
            wake: Notify::new(),
            notifier,
            config,
        });

        let worker = tokio::spawn(consume(Arc::clone(&shared), executor));

        Self {
            shared,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Append a snapshot of `entity` and return immediately.
    pub fn enqueue(&self, entity: P) -> Result<(), DispatchError> {
        let entity_id = entity.entity_id();
        let request = DispatchRequest {
            label: entity.display_name(),
            entity_id: entity_id.clone(),
            payload: entity,
            enqueued_at: Instant::now(),
        };

        {
            let mut state = self
                .shared
                .state
                .lock()
                .map_err(|_| DispatchError::QueueClosed)?;
            if state.closed {
                return Err(DispatchError::QueueClosed);
            }
            if !state.in_flight.insert(entity_id.clone()) {
                return Err(DispatchError::AlreadyInFlight(entity_id));
            }
            state.pending.push_back(request.clone());
            tracing::debug!(
                workflow = %self.shared.config.workflow,
                entity_id = %entity_id,
                depth = state.pending.len(),
                "Dispatch enqueued"
            );
        }

        self.shared.notify(
            NotificationLevel::Info,
            &request,
            format!("{} queued for {}", self.shared.config.workflow, request.label),
        );
        self.shared.wake.notify_one();
        Ok(())
    }
}

impl<P> SequentialDispatchQueue<P> {
    pub fn workflow(&self) -> WorkflowKind {
        self.shared.config.workflow
    }

    pub fn is_in_flight(&self, entity_id: &str) -> bool {
        self.shared
            .state
            .lock()
            .map(|s| s.in_flight.contains(entity_id))
            .unwrap_or(false)
    }

    pub fn pending_len(&self) -> usize {
        self.shared.state.lock().map(|s| s.pending.len()).unwrap_or(0)
    }

    pub fn is_dispatching(&self) -> bool {
        self.shared
            .state
            .lock()
            .map(|s| s.is_dispatching)
            .unwrap_or(false)
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        let workflow = self.shared.config.workflow;
        let Ok(state) = self.shared.state.lock() else {
            return QueueSnapshot {
                workflow,
                pending: Vec::new(),
                in_flight: Vec::new(),
                is_dispatching: false,
                closed: true,
            };
        };
        let mut in_flight: Vec<String> = state.in_flight.iter().cloned().collect();
        in_flight.sort();
        QueueSnapshot {
            workflow,
            pending: state.pending.iter().map(|r| r.entity_id.clone()).collect(),
            in_flight,
            is_dispatching: state.is_dispatching,
            closed: state.closed,
        }
    }

    /// Tear the queue down: cancel the consumer (including a pending
    /// spacing sleep) and discard queued requests. Idempotent.
    pub fn shutdown(&self) {
        let discarded = match self.shared.state.lock() {
            Ok(mut state) => {
                if state.closed {
                    return;
                }
                state.closed = true;
                state.is_dispatching = false;
                state.in_flight.clear();
                let n = state.pending.len();
                state.pending.clear();
                n
            }
            Err(_) => 0,
        };

        if let Ok(mut worker) = self.worker.lock() {
            if let Some(handle) = worker.take() {
                handle.abort();
            }
        }

        if discarded > 0 {
            tracing::warn!(
                workflow = %self.shared.config.workflow,
                discarded,
                "Dispatch queue torn down with pending requests"
            );
        } else {
            tracing::debug!(workflow = %self.shared.config.workflow, "Dispatch queue torn down");
        }
    }
}

impl<P> Drop for SequentialDispatchQueue<P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ═══════════════════════════════════════════════════════════
// Consumer loop
// ═══════════════════════════════════════════════════════════

async fn consume<P, E>(shared: Arc<Shared<P>>, executor: E)
where
    P: Dispatchable,
    E: DispatchExecutor<P>,
{
    let workflow = shared.config.workflow;
    loop {
        let request = match shared.begin_next() {
            Next::Dispatch(request) => request,
            Next::Idle => {
                shared.wake.notified().await;
                continue;
            }
            Next::Closed => break,
        };

        let wait = request.remaining_wait(shared.config.spacing, Instant::now());
        if !wait.is_zero() {
            tracing::debug!(
                %workflow,
                entity_id = %request.entity_id,
                wait_ms = wait.as_millis() as u64,
                "Waiting before dispatch"
            );
            tokio::time::sleep(wait).await;
        }
        if shared.is_closed() {
            break;
        }

        tracing::info!(%workflow, entity_id = %request.entity_id, "Dispatching");
        let result = AssertUnwindSafe(executor.execute(&request.payload))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| Err(DispatchError::ExecutorPanicked));
        if let Err(e) = &result {
            tracing::warn!(%workflow, entity_id = %request.entity_id, error = %e, "Dispatch failed");
        }

        // Torn down while the request was on the wire: stay silent.
        let Some(remaining) = shared.finish_head(&request.entity_id) else {
            break;
        };
        shared.report(&request, result);

        if remaining > 0 {
            tokio::time::sleep(shared.config.continuation_debounce).await;
        }
    }
    tracing::debug!(%workflow, "Dispatch consumer stopped");
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
