//! Notification polling endpoint.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::types::ApiContext;
use crate::dispatch::FeedEntry;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 200;

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    /// Return entries with a sequence number above this cursor.
    #[serde(default)]
    pub after: u64,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct FeedResponse {
    pub entries: Vec<FeedEntry>,
    pub last_seq: u64,
}

/// `GET /api/notifications?after=<seq>&limit=<n>`
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<FeedQuery>,
) -> Json<FeedResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    Json(FeedResponse {
        entries: ctx.core.feed.since(query.after, limit),
        last_seq: ctx.core.feed.last_seq(),
    })
}
