//! Converse wire types.
//!
//! Message and content-block shapes follow the Bedrock converse format:
//! externally-tagged content blocks (`{"text": ...}`, `{"toolUse": {...}}`,
//! `{"toolResult": {...}}`) and camelCase field names.

use serde::{Deserialize, Serialize};

/// Conversation roles. Tool results travel in user-role messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolUseBlock {
    pub tool_use_id: String,
    pub name: String,
    pub input: serde_json::Value,
}

/// JSON payload inside a tool-result block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ToolResultContent {
    #[serde(rename = "json")]
    Json(serde_json::Value),
}

/// A tool result fed back to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResultBlock {
    pub tool_use_id: String,
    pub content: Vec<ToolResultContent>,
}

/// An inline image (base64) attached to a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub format: String,
    pub source: ImageSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSource {
    pub bytes: String,
}

/// One content block within a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text(String),
    #[serde(rename = "image")]
    Image(ImageBlock),
    #[serde(rename = "toolUse")]
    ToolUse(ToolUseBlock),
    #[serde(rename = "toolResult")]
    ToolResult(ToolResultBlock),
}

/// One conversation message in the converse wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// A plain text message from the user.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::Text(text.into())],
        }
    }

    /// A plain text message from the assistant.
    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: vec![ContentBlock::Text(text.into())],
        }
    }

    /// A user-role message carrying tool results back to the model.
    pub fn tool_results(results: Vec<ToolResultBlock>) -> Self {
        Self {
            role: Role::User,
            content: results.into_iter().map(ContentBlock::ToolResult).collect(),
        }
    }
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
    StopSequence,
    #[serde(other)]
    Other,
}

/// A tool call extracted from a model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub tool_use_id: String,
    pub name: String,
    pub input: serde_json::Value,
}

/// A complete model response for one inference round.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceResponse {
    /// Concatenated text blocks; empty for pure tool-use rounds.
    pub text: String,
    pub stop_reason: StopReason,
    pub tool_calls: Vec<ToolCallRequest>,
    /// The assistant message exactly as returned, for appending to the
    /// conversation before tool results.
    pub raw_message: Message,
}

impl InferenceResponse {
    /// A plain final-text response.
    pub fn final_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            raw_message: Message::assistant_text(text.clone()),
            text,
            stop_reason: StopReason::EndTurn,
            tool_calls: Vec::new(),
        }
    }

    /// A response requesting a single tool invocation.
    pub fn tool_use(
        tool_use_id: impl Into<String>,
        name: impl Into<String>,
        input: serde_json::Value,
    ) -> Self {
        let block = ToolUseBlock {
            tool_use_id: tool_use_id.into(),
            name: name.into(),
            input,
        };
        Self {
            text: String::new(),
            stop_reason: StopReason::ToolUse,
            tool_calls: vec![ToolCallRequest {
                tool_use_id: block.tool_use_id.clone(),
                name: block.name.clone(),
                input: block.input.clone(),
            }],
            raw_message: Message {
                role: Role::Assistant,
                content: vec![ContentBlock::ToolUse(block)],
            },
        }
    }
}

/// A tool described to the model: name, natural-language description, and
/// JSON input schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

impl ToolDefinition {
    /// Serialize to the converse `toolConfig` entry shape.
    pub fn to_wire(&self) -> serde_json::Value {
        serde_json::json!({
            "toolSpec": {
                "name": self.name,
                "description": self.description,
                "inputSchema": { "json": self.input_schema },
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_block_wire_shape() {
        let msg = Message::user_text("hello");
        let wire = serde_json::to_value(&msg).unwrap();
        assert_eq!(wire, json!({"role": "user", "content": [{"text": "hello"}]}));
    }

    #[test]
    fn test_tool_use_block_wire_shape() {
        let block = ContentBlock::ToolUse(ToolUseBlock {
            tool_use_id: "t1".to_string(),
            name: "check_benefit_eligibility".to_string(),
            input: json!({"annual_income": 24000}),
        });
        let wire = serde_json::to_value(&block).unwrap();
        assert_eq!(
            wire,
            json!({
                "toolUse": {
                    "toolUseId": "t1",
                    "name": "check_benefit_eligibility",
                    "input": {"annual_income": 24000}
                }
            })
        );
    }

    #[test]
    fn test_tool_result_wire_shape() {
        let msg = Message::tool_results(vec![ToolResultBlock {
            tool_use_id: "t1".to_string(),
            content: vec![ToolResultContent::Json(json!({"ok": true}))],
        }]);
        let wire = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            wire,
            json!({
                "role": "user",
                "content": [{
                    "toolResult": {
                        "toolUseId": "t1",
                        "content": [{"json": {"ok": true}}]
                    }
                }]
            })
        );
    }

    #[test]
    fn test_message_roundtrip() {
        let msg = Message {
            role: Role::Assistant,
            content: vec![
                ContentBlock::Text("Checking now.".to_string()),
                ContentBlock::ToolUse(ToolUseBlock {
                    tool_use_id: "t9".to_string(),
                    name: "find_local_resources".to_string(),
                    input: json!({"zip_code": "94601", "needs_list": ["food"]}),
                }),
            ],
        };
        let wire = serde_json::to_string(&msg).unwrap();
        let parsed: Message = serde_json::from_str(&wire).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn test_stop_reason_parsing() {
        assert_eq!(
            serde_json::from_str::<StopReason>("\"end_turn\"").unwrap(),
            StopReason::EndTurn
        );
        assert_eq!(
            serde_json::from_str::<StopReason>("\"tool_use\"").unwrap(),
            StopReason::ToolUse
        );
        assert_eq!(
            serde_json::from_str::<StopReason>("\"guardrail_intervened\"").unwrap(),
            StopReason::Other
        );
    }

    #[test]
    fn test_response_constructors() {
        let final_resp = InferenceResponse::final_text("done");
        assert_eq!(final_resp.stop_reason, StopReason::EndTurn);
        assert!(final_resp.tool_calls.is_empty());

        let tool_resp = InferenceResponse::tool_use("t1", "create_action_plan", json!({}));
        assert_eq!(tool_resp.stop_reason, StopReason::ToolUse);
        assert_eq!(tool_resp.tool_calls.len(), 1);
        assert_eq!(tool_resp.tool_calls[0].name, "create_action_plan");
    }

    #[test]
    fn test_tool_definition_wire_shape() {
        let def = ToolDefinition {
            name: "check_benefit_eligibility".to_string(),
            description: "Check programs".to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
        };
        let wire = def.to_wire();
        assert_eq!(wire["toolSpec"]["name"], "check_benefit_eligibility");
        assert!(wire["toolSpec"]["inputSchema"]["json"].is_object());
    }
}
