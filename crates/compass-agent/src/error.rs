//! Error types for the conversation agent.

use compass_core::error::CompassError;
use compass_inference::InferenceError;
use compass_tools::ToolError;

/// Errors from the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("session not found: {0}")]
    SessionNotFound(String),
    #[error("unknown program: {0}")]
    UnknownProgram(String),
    #[error("inference error: {0}")]
    Inference(String),
    #[error("tool error: {0}")]
    Tool(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<InferenceError> for AgentError {
    fn from(err: InferenceError) -> Self {
        AgentError::Inference(err.to_string())
    }
}

impl From<ToolError> for AgentError {
    fn from(err: ToolError) -> Self {
        AgentError::Tool(err.to_string())
    }
}

impl From<CompassError> for AgentError {
    fn from(err: CompassError) -> Self {
        AgentError::Storage(err.to_string())
    }
}

impl From<AgentError> for CompassError {
    fn from(err: AgentError) -> Self {
        CompassError::Agent(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_error_display() {
        assert_eq!(AgentError::EmptyMessage.to_string(), "message cannot be empty");
        assert_eq!(
            AgentError::MessageTooLong(4000).to_string(),
            "message exceeds maximum length of 4000 characters"
        );
        assert_eq!(
            AgentError::SessionNotFound("abc".to_string()).to_string(),
            "session not found: abc"
        );
        assert_eq!(
            AgentError::UnknownProgram("zeppelin_subsidy".to_string()).to_string(),
            "unknown program: zeppelin_subsidy"
        );
    }

    #[test]
    fn test_conversions() {
        let err: AgentError = InferenceError::Timeout.into();
        assert!(matches!(err, AgentError::Inference(_)));

        let err: AgentError = ToolError::UnknownTool("x".to_string()).into();
        assert!(matches!(err, AgentError::Tool(_)));

        let err: AgentError = CompassError::Storage("disk".to_string()).into();
        assert!(matches!(err, AgentError::Storage(_)));

        let err: CompassError = AgentError::EmptyMessage.into();
        assert!(matches!(err, CompassError::Agent(_)));
    }
}
