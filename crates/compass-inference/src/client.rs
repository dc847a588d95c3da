//! The inference client trait.

use async_trait::async_trait;

use crate::error::InferenceError;
use crate::types::{InferenceResponse, Message, ToolDefinition};

/// Contract the external inference service must satisfy.
///
/// Implementations decide transport and model; the orchestrator only sees
/// the typed response. Calls are the orchestrator's only suspension points
/// besides tool handlers that reach external collaborators.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Send the visible conversation plus the tool catalog and return the
    /// model's next step: final text or tool requests.
    async fn converse(
        &self,
        messages: &[Message],
        system: &str,
        tools: &[ToolDefinition],
    ) -> Result<InferenceResponse, InferenceError>;
}
