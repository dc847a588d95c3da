//! Error types for tool dispatch and handlers.

use compass_core::error::CompassError;
use thiserror::Error;

/// Errors from the tool registry and handlers.
///
/// Validation failures are raised before the handler runs; handler errors
/// are recorded in the turn's trace and fed back to the model rather than
/// aborting the turn.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("invalid tool input: {0}")]
    InvalidInput(String),
    #[error("tool handler failed: {0}")]
    Handler(String),
    #[error("document vision failed: {0}")]
    Vision(String),
}

impl From<ToolError> for CompassError {
    fn from(err: ToolError) -> Self {
        CompassError::Tool(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_display() {
        assert_eq!(
            ToolError::UnknownTool("summon_helicopter".to_string()).to_string(),
            "unknown tool: summon_helicopter"
        );
        assert_eq!(
            ToolError::InvalidInput("annual_income must be non-negative".to_string()).to_string(),
            "invalid tool input: annual_income must be non-negative"
        );
        assert_eq!(
            ToolError::Handler("lookup failed".to_string()).to_string(),
            "tool handler failed: lookup failed"
        );
        assert_eq!(
            ToolError::Vision("not configured".to_string()).to_string(),
            "document vision failed: not configured"
        );
    }

    #[test]
    fn test_into_compass_error() {
        let err: CompassError = ToolError::UnknownTool("x".to_string()).into();
        assert!(matches!(err, CompassError::Tool(_)));
    }
}
