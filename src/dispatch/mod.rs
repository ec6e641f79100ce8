//! Sequential webhook dispatch.
//!
//! ## Architecture
//!
//! ```text
//! gate (resend confirmation) → queue (FIFO, spacing, single consumer)
//!                                 → executor (webhook POST → status update)
//!                                 → notifier (one terminal message per entity)
//! ```
//!
//! Each workflow view owns its own `SequentialDispatchQueue`; nothing here
//! is process-global.

pub mod error;
pub mod executor;
pub mod gate;
pub mod notifications;
pub mod queue;
pub mod traits;
pub mod types;

pub use error::{DispatchError, StatusSyncError};
pub use executor::{WebhookExecutor, WebhookTarget};
pub use gate::{request_dispatch, GateDecision};
pub use notifications::{FeedEntry, NotificationFeed};
pub use queue::SequentialDispatchQueue;
pub use traits::*;
pub use types::*;
