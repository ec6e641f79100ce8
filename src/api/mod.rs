//! Dispatch HTTP API.
//!
//! Exposes the two dispatch workflows (scheduling release, receivable
//! payment request), their queue state and the notification feed as
//! JSON endpoints under `/api/`.
//!
//! The router is composable: `dispatch_api_router()` returns a `Router`
//! that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::dispatch_api_router;
pub use server::{start_server, DispatchServer, ServerSession};
pub use types::ApiContext;
