//! Tool registry: name-keyed dispatch with input validation.
//!
//! The registry validates raw input against the tool's declared parameter
//! specs before the handler runs, and times successful dispatches. It holds
//! no mutable state and is safe to share across concurrent sessions.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;

use compass_inference::ToolDefinition;

use crate::error::ToolError;

/// Primitive type expected for one tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Number,
    Integer,
    Boolean,
    StringArray,
    ObjectArray,
}

impl ParamKind {
    fn json_schema(&self) -> Value {
        match self {
            ParamKind::String => serde_json::json!({"type": "string"}),
            ParamKind::Number => serde_json::json!({"type": "number"}),
            ParamKind::Integer => serde_json::json!({"type": "integer"}),
            ParamKind::Boolean => serde_json::json!({"type": "boolean"}),
            ParamKind::StringArray => {
                serde_json::json!({"type": "array", "items": {"type": "string"}})
            }
            ParamKind::ObjectArray => {
                serde_json::json!({"type": "array", "items": {"type": "object"}})
            }
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            ParamKind::String => value.is_string(),
            ParamKind::Number => value.is_number(),
            ParamKind::Integer => value.is_i64() || value.is_u64(),
            ParamKind::Boolean => value.is_boolean(),
            ParamKind::StringArray => value
                .as_array()
                .is_some_and(|a| a.iter().all(|v| v.is_string())),
            ParamKind::ObjectArray => value
                .as_array()
                .is_some_and(|a| a.iter().all(|v| v.is_object())),
        }
    }
}

/// Declaration of one tool parameter.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    /// Reject negative values for numeric parameters.
    pub non_negative: bool,
    pub description: &'static str,
}

/// Declaration of a tool: its name, description, and parameters.
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

impl ToolSpec {
    /// JSON input schema in the shape the inference service consumes.
    pub fn input_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        for param in self.params {
            let mut schema = param.kind.json_schema();
            schema["description"] = Value::String(param.description.to_string());
            properties.insert(param.name.to_string(), schema);
            if param.required {
                required.push(Value::String(param.name.to_string()));
            }
        }
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// The wire-level tool definition for the inference catalog.
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: self.input_schema(),
        }
    }

    /// Validate raw input against this spec.
    ///
    /// Checks required presence, primitive type, and non-negativity for
    /// flagged numeric fields. Extra fields are tolerated.
    pub fn validate(&self, input: &Value) -> Result<(), ToolError> {
        let object = input
            .as_object()
            .ok_or_else(|| ToolError::InvalidInput("input must be a JSON object".to_string()))?;

        for param in self.params {
            match object.get(param.name) {
                None | Some(Value::Null) => {
                    if param.required {
                        return Err(ToolError::InvalidInput(format!(
                            "missing required parameter: {}",
                            param.name
                        )));
                    }
                }
                Some(value) => {
                    if !param.kind.matches(value) {
                        return Err(ToolError::InvalidInput(format!(
                            "parameter {} has the wrong type",
                            param.name
                        )));
                    }
                    if param.non_negative {
                        if let Some(n) = value.as_f64() {
                            if n < 0.0 {
                                return Err(ToolError::InvalidInput(format!(
                                    "parameter {} must be non-negative",
                                    param.name
                                )));
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// A named, schema-validated capability the orchestrator can invoke.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn spec(&self) -> &'static ToolSpec;

    /// Execute with pre-validated input. Side effects are confined here.
    async fn execute(&self, input: &Value) -> Result<Value, ToolError>;
}

/// A handler's output plus the time it took.
#[derive(Debug, Clone)]
pub struct ToolOutcome {
    pub output: Value,
    pub elapsed_ms: u64,
}

/// Name-keyed mapping from tool name to handler. Stateless after
/// construction and safe for concurrent use.
#[derive(Default)]
pub struct ToolRegistry {
    handlers: HashMap<&'static str, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its spec name. Replaces any previous
    /// handler with the same name.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        self.handlers.insert(handler.spec().name, handler);
    }

    /// Wire-level definitions for every registered tool, in a stable order.
    pub fn specs(&self) -> Vec<ToolDefinition> {
        let mut specs: Vec<&'static ToolSpec> =
            self.handlers.values().map(|h| h.spec()).collect();
        specs.sort_by(|a, b| a.name.cmp(b.name));
        specs.iter().map(|s| s.definition()).collect()
    }

    /// Validate input and, on success, execute the named handler.
    ///
    /// Validation failures return a structured error without invoking the
    /// handler.
    pub async fn dispatch(&self, name: &str, input: &Value) -> Result<ToolOutcome, ToolError> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        handler.spec().validate(input)?;

        let started = Instant::now();
        let output = handler.execute(input).await?;
        Ok(ToolOutcome {
            output,
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
