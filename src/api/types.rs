//! Shared types for the dispatch API layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core_state::CoreState;
use crate::dispatch::{GateDecision, QueueSnapshot};

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

/// Query string of the dispatch endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct DispatchQuery {
    /// Set after the user confirmed resending an already-requested record.
    #[serde(default)]
    pub confirm_resend: bool,
}

/// `202 Accepted` body of the dispatch endpoints.
#[derive(Debug, Serialize)]
pub struct DispatchAccepted {
    pub entity_id: String,
    pub decision: GateDecision,
    pub queue: QueueSnapshot,
}
