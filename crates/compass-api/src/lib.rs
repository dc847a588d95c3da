//! Compass API crate - axum HTTP server, route handlers, SSE streaming.
//!
//! Exposes the chat orchestrator over REST: turn submission (plain and
//! streaming), session retrieval and deletion, the program catalog, demo
//! personas, the portal handoff, and health checks.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
