//! Compass agent crate - the tool-use conversation orchestrator.
//!
//! Runs the per-turn state machine around the external inference service:
//! consult the model, dispatch requested tools through the registry, feed
//! results back, and finish with a final natural-language answer. Also
//! provides the streaming turn-event channel and the portal-automation
//! handoff.

pub mod error;
pub mod orchestrator;
pub mod portal;
pub mod prompt;
pub mod stream;

pub use error::AgentError;
pub use orchestrator::{Orchestrator, RetryPolicy, TurnOutput};
pub use portal::{ManualFallbackDriver, PortalDriver, PortalRequest};
pub use stream::TurnEvent;
