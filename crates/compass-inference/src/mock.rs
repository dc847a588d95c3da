//! Scripted inference client for deterministic tests.
//!
//! Yields queued responses in FIFO order without performing network calls,
//! so orchestrator behavior (tool loops, retries, loop caps) can be
//! exercised exactly.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::InferenceClient;
use crate::error::InferenceError;
use crate::types::{InferenceResponse, Message, ToolDefinition};

/// Deterministic `InferenceClient` that yields queued results.
#[derive(Default)]
pub struct ScriptedClient {
    queue: Mutex<VecDeque<Result<InferenceResponse, InferenceError>>>,
    calls: Mutex<u32>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response and return the client for chaining.
    pub fn with_response(self, response: InferenceResponse) -> Self {
        self.queue.lock().unwrap().push_back(Ok(response));
        self
    }

    /// Queue an error result and return the client for chaining.
    pub fn with_error(self, error: InferenceError) -> Self {
        self.queue.lock().unwrap().push_back(Err(error));
        self
    }

    /// Number of converse calls made so far.
    pub fn call_count(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl InferenceClient for ScriptedClient {
    async fn converse(
        &self,
        _messages: &[Message],
        _system: &str,
        _tools: &[ToolDefinition],
    ) -> Result<InferenceResponse, InferenceError> {
        *self.calls.lock().unwrap() += 1;
        self.queue.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(InferenceError::InvalidResponse(
                "scripted client has no queued responses".to_string(),
            ))
        })
    }
}
