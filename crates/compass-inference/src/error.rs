//! Error types for the inference client.

use compass_core::error::CompassError;
use thiserror::Error;

/// Errors from the external inference service.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Required API key environment variable is absent. Raised at startup,
    /// before any session is accepted.
    #[error("missing credentials: environment variable {0} is not set")]
    MissingCredentials(String),
    #[error("inference endpoint returned status {status}: {message}")]
    Http { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("inference request timed out")]
    Timeout,
    #[error("invalid inference response: {0}")]
    InvalidResponse(String),
}

impl InferenceError {
    /// True for failures worth retrying with backoff.
    pub fn is_transient(&self) -> bool {
        match self {
            InferenceError::Timeout | InferenceError::Transport(_) => true,
            InferenceError::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<InferenceError> for CompassError {
    fn from(err: InferenceError) -> Self {
        CompassError::Inference(err.to_string())
    }
}
