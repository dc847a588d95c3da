//! Compass inference crate - the external inference service contract.
//!
//! Defines the `InferenceClient` trait and the converse wire types, an HTTP
//! implementation for a Bedrock-style converse endpoint, the document-vision
//! collaborator trait, and a scripted client for deterministic tests.

pub mod bedrock;
pub mod client;
pub mod error;
pub mod mock;
pub mod types;
pub mod vision;

pub use bedrock::BedrockClient;
pub use client::InferenceClient;
pub use error::InferenceError;
pub use mock::ScriptedClient;
pub use types::{
    ContentBlock, InferenceResponse, Message, Role, StopReason, ToolCallRequest, ToolDefinition,
    ToolResultBlock, ToolUseBlock,
};
pub use vision::{DocumentVision, NoVision};
