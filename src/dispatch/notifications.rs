//! In-memory notification feed.
//!
//! Every notification is logged through `tracing` and kept in a bounded
//! ring so the frontend can poll for new entries by sequence number.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde::Serialize;
use uuid::Uuid;

use super::traits::Notifier;
use super::types::{Notification, NotificationLevel};

/// Entries kept before the oldest are evicted.
pub const DEFAULT_FEED_CAPACITY: usize = 200;

/// A stored notification with its feed position.
#[derive(Debug, Clone, Serialize)]
pub struct FeedEntry {
    pub seq: u64,
    pub id: Uuid,
    pub created_at: String,
    #[serde(flatten)]
    pub notification: Notification,
}

struct FeedInner {
    entries: VecDeque<FeedEntry>,
    next_seq: u64,
}

pub struct NotificationFeed {
    inner: Mutex<FeedInner>,
    capacity: usize,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_FEED_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(FeedInner {
                entries: VecDeque::with_capacity(capacity),
                next_seq: 1,
            }),
            capacity: capacity.max(1),
        }
    }

    /// Entries with `seq > after`, oldest first, at most `limit`.
    pub fn since(&self, after: u64, limit: usize) -> Vec<FeedEntry> {
        let Ok(inner) = self.inner.lock() else {
            return Vec::new();
        };
        inner
            .entries
            .iter()
            .filter(|e| e.seq > after)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Highest sequence number handed out so far (0 when empty).
    pub fn last_seq(&self) -> u64 {
        self.inner
            .lock()
            .map(|inner| inner.next_seq - 1)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Notifications recorded for one entity, oldest first.
    pub fn for_entity(&self, entity_id: &str) -> Vec<Notification> {
        let Ok(inner) = self.inner.lock() else {
            return Vec::new();
        };
        inner
            .entries
            .iter()
            .filter(|e| e.notification.entity_id == entity_id)
            .map(|e| e.notification.clone())
            .collect()
    }
}

impl Default for NotificationFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotificationFeed {
    fn notify(&self, notification: Notification) {
        log_notification(&notification);

        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        let seq = inner.next_seq;
        inner.next_seq += 1;
        if inner.entries.len() == self.capacity {
            inner.entries.pop_front();
        }
        inner.entries.push_back(FeedEntry {
            seq,
            id: Uuid::new_v4(),
            created_at: chrono::Utc::now().to_rfc3339(),
            notification,
        });
    }
}

fn log_notification(n: &Notification) {
    match n.level {
        NotificationLevel::Info | NotificationLevel::Success => tracing::info!(
            workflow = %n.workflow,
            entity_id = %n.entity_id,
            "{}",
            n.message
        ),
        NotificationLevel::Warning => tracing::warn!(
            workflow = %n.workflow,
            entity_id = %n.entity_id,
            "{}",
            n.message
        ),
        NotificationLevel::Error => tracing::error!(
            workflow = %n.workflow,
            entity_id = %n.entity_id,
            "{}",
            n.message
        ),
    }
}
