//! Tool trait definition
//!
//! Defines the core trait for operations the host agent can invoke by
//! name with a JSON input.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Value as JsonValue, json};

use crate::Result;

/// Tool execution result
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Output string from tool execution (JSON text for memory tools)
    pub output: String,
    /// Whether the execution resulted in an error
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            is_error: false,
        }
    }

    /// Create an error tool result
    pub fn error(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            is_error: true,
        }
    }

    /// Successful result carrying `value` serialized as JSON
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self::success(serde_json::to_string(value)?))
    }

    /// Error result with an `{"error": message}` body
    pub fn error_message(message: impl Into<String>) -> Self {
        Self::error(json!({ "error": message.into() }).to_string())
    }

    /// Parse the output back into JSON
    pub fn output_json(&self) -> Result<JsonValue> {
        Ok(serde_json::from_str(&self.output)?)
    }
}

/// Tool trait for host agent tool calls
///
/// Implement this trait to expose an operation that the host agent can
/// discover through its definition and invoke by name.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name
    fn name(&self) -> &str;

    /// Get the tool description (shown to the agent when selecting tools)
    fn description(&self) -> &str;

    /// Get the JSON schema for the tool's input parameters
    fn input_schema(&self) -> JsonValue;

    /// Execute the tool with the given input
    ///
    /// # Arguments
    /// * `input` - JSON value containing the tool input parameters
    ///
    /// # Returns
    /// A `ToolResult` containing the output or error message
    async fn execute(&self, input: JsonValue) -> Result<ToolResult>;
}
