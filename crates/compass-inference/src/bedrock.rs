//! HTTP client for a Bedrock-style converse endpoint.
//!
//! Authenticates with a bearer API key read from the environment at
//! construction time, so a missing key fails at process start rather than
//! mid-conversation.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};

use compass_core::config::InferenceConfig;

use crate::client::InferenceClient;
use crate::error::InferenceError;
use crate::types::{ContentBlock, InferenceResponse, Message, StopReason, ToolCallRequest, ToolDefinition};

/// Client for a converse-API inference endpoint.
#[derive(Debug)]
pub struct BedrockClient {
    http: reqwest::Client,
    endpoint: String,
    model_id: String,
    api_key: String,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
}

/// Response envelope returned by the converse endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConverseEnvelope {
    stop_reason: StopReason,
    output: ConverseOutput,
}

#[derive(Debug, Deserialize)]
struct ConverseOutput {
    message: Message,
}

impl BedrockClient {
    /// Build a client from configuration, reading the API key from the
    /// environment variable named in the config.
    pub fn from_config(config: &InferenceConfig) -> Result<Self, InferenceError> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| InferenceError::MissingCredentials(config.api_key_env.clone()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model_id: config.model_id.clone(),
            api_key,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
        })
    }

    fn converse_url(&self) -> String {
        format!("{}/model/{}/converse", self.endpoint, self.model_id)
    }

    fn request_body(
        &self,
        messages: &[Message],
        system: &str,
        tools: &[ToolDefinition],
    ) -> serde_json::Value {
        let mut body = serde_json::json!({
            "messages": messages,
            "system": [{"text": system}],
            "inferenceConfig": {
                "maxTokens": self.max_tokens,
                "temperature": self.temperature,
                "topP": self.top_p,
            },
        });
        if !tools.is_empty() {
            let specs: Vec<serde_json::Value> = tools.iter().map(|t| t.to_wire()).collect();
            body["toolConfig"] = serde_json::json!({ "tools": specs });
        }
        body
    }
}

#[async_trait]
impl InferenceClient for BedrockClient {
    async fn converse(
        &self,
        messages: &[Message],
        system: &str,
        tools: &[ToolDefinition],
    ) -> Result<InferenceResponse, InferenceError> {
        let body = self.request_body(messages, system, tools);
        debug!(model = %self.model_id, messages = messages.len(), "Sending converse request");

        let response = self
            .http
            .post(self.converse_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InferenceError::Timeout
                } else {
                    InferenceError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Converse request failed");
            return Err(InferenceError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ConverseEnvelope = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        Ok(parse_response(envelope))
    }
}

/// Flatten a converse envelope into the typed response.
fn parse_response(envelope: ConverseEnvelope) -> InferenceResponse {
    let message = envelope.output.message;

    let mut text_parts = Vec::new();
    let mut tool_calls = Vec::new();
    for block in &message.content {
        match block {
            ContentBlock::Text(text) => text_parts.push(text.clone()),
            ContentBlock::ToolUse(tool_use) => tool_calls.push(ToolCallRequest {
                tool_use_id: tool_use.tool_use_id.clone(),
                name: tool_use.name.clone(),
                input: tool_use.input.clone(),
            }),
            _ => {}
        }
    }

    InferenceResponse {
        text: text_parts.join("\n"),
        stop_reason: envelope.stop_reason,
        tool_calls,
        raw_message: message,
    }
}
