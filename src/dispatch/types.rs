//! Types shared by the dispatch queue, executors and notification feed.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use super::error::StatusSyncError;

/// Minimum time between enqueueing a request and sending it.
pub const DEFAULT_SPACING: Duration = Duration::from_millis(2000);

/// Pause before the consumer picks the next head. Carries no meaning
/// beyond letting other tasks run between dispatches.
pub const DEFAULT_CONTINUATION_DEBOUNCE: Duration = Duration::from_millis(25);

// ═══════════════════════════════════════════════════════════
// Workflow identity
// ═══════════════════════════════════════════════════════════

/// Which outbound workflow a queue serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    /// Scheduling release ("liberar agendamento").
    SchedulingRelease,
    /// Receivable payment request ("solicitar pagamento").
    ReceivablePayment,
}

impl std::fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SchedulingRelease => write!(f, "Scheduling release"),
            Self::ReceivablePayment => write!(f, "Payment request"),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Queue types
// ═══════════════════════════════════════════════════════════

/// Queue tuning. `new` gives the production values.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    pub workflow: WorkflowKind,
    pub spacing: Duration,
    pub continuation_debounce: Duration,
}

impl QueueConfig {
    pub fn new(workflow: WorkflowKind) -> Self {
        Self {
            workflow,
            spacing: DEFAULT_SPACING,
            continuation_debounce: DEFAULT_CONTINUATION_DEBOUNCE,
        }
    }

    pub fn with_spacing(mut self, spacing: Duration) -> Self {
        self.spacing = spacing;
        self
    }
}

/// One queued dispatch. The payload is an owned snapshot taken at enqueue.
#[derive(Debug, Clone)]
pub struct DispatchRequest<P> {
    pub entity_id: String,
    pub label: String,
    pub payload: P,
    pub enqueued_at: Instant,
}

impl<P> DispatchRequest<P> {
    /// Remaining spacing wait as of `now`. Zero once `spacing` has elapsed.
    pub fn remaining_wait(&self, spacing: Duration, now: Instant) -> Duration {
        spacing.saturating_sub(now.saturating_duration_since(self.enqueued_at))
    }
}

/// Read-only view of a queue for callers (button states, polling).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueSnapshot {
    pub workflow: WorkflowKind,
    /// Entity ids in dispatch order; the head is first.
    pub pending: Vec<String>,
    /// Entity ids queued or being dispatched, sorted.
    pub in_flight: Vec<String>,
    pub is_dispatching: bool,
    pub closed: bool,
}

// ═══════════════════════════════════════════════════════════
// Executor outcome
// ═══════════════════════════════════════════════════════════

/// Keys checked, in order, for a human-readable webhook reply.
const ACK_MESSAGE_KEYS: &[&str] = &["message", "msg", "description"];

/// Parsed webhook response body. Empty or non-JSON bodies become `{}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerAck(pub serde_json::Value);

impl ServerAck {
    pub fn empty() -> Self {
        Self(serde_json::Value::Object(serde_json::Map::new()))
    }

    /// Lenient body parse.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) if !value.is_null() => Self(value),
            _ => Self::empty(),
        }
    }

    /// First string under `message`, `msg` or `description`, otherwise the
    /// raw JSON dump.
    pub fn message(&self) -> String {
        ACK_MESSAGE_KEYS
            .iter()
            .find_map(|key| self.0.get(*key).and_then(|v| v.as_str()))
            .map(String::from)
            .unwrap_or_else(|| self.0.to_string())
    }
}

/// Result of a webhook dispatch that reached the target.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub ack: ServerAck,
    /// Secondary status update. `Err` does not undo the dispatch.
    pub status_sync: Result<(), StatusSyncError>,
}

impl DispatchOutcome {
    pub fn synced(ack: ServerAck) -> Self {
        Self {
            ack,
            status_sync: Ok(()),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Notifications
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// User-facing message about one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub workflow: WorkflowKind,
    pub entity_id: String,
    pub entity_label: String,
    pub message: String,
}

impl Notification {
    pub fn new(
        level: NotificationLevel,
        workflow: WorkflowKind,
        entity_id: &str,
        entity_label: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            workflow,
            entity_id: entity_id.to_string(),
            entity_label: entity_label.to_string(),
            message: message.into(),
        }
    }
}
