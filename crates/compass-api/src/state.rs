//! Application state shared across all route handlers.
//!
//! AppState holds references to the orchestrator, the session store, and
//! the loaded configuration. It is passed to handlers via axum's State
//! extractor.

use std::sync::Arc;
use std::time::Instant;

use compass_agent::Orchestrator;
use compass_core::config::CompassConfig;
use compass_store::SessionRepository;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<CompassConfig>,
    /// The conversation orchestrator.
    pub orchestrator: Arc<Orchestrator>,
    /// SQLite-backed session store, for read endpoints.
    pub store: Arc<SessionRepository>,
    /// Server start time for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState with the given components.
    pub fn new(
        config: CompassConfig,
        orchestrator: Arc<Orchestrator>,
        store: Arc<SessionRepository>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            orchestrator,
            store,
            start_time: Instant::now(),
        }
    }
}
