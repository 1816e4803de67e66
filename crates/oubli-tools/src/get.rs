//! memory_get tool

use async_trait::async_trait;
use oubli_core::{Result, Tool, ToolResult};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{MemoryDetail, SharedStore, lock_store, parse_input};

/// Get full details of a memory by ID
pub struct MemoryGetTool {
    store: SharedStore,
}

impl MemoryGetTool {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize)]
struct GetInput {
    memory_id: String,
}

#[async_trait]
impl Tool for MemoryGetTool {
    fn name(&self) -> &str {
        "memory_get"
    }

    fn description(&self) -> &str {
        "Get the full details of a memory by ID."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "memory_id": {
                    "type": "string",
                    "description": "The ID of the memory to retrieve"
                }
            },
            "required": ["memory_id"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult> {
        let input: GetInput = parse_input(self.name(), input)?;

        let memory = lock_store(&self.store)?.get(&input.memory_id)?;
        match memory {
            Some(memory) => ToolResult::json(&MemoryDetail::from(memory)),
            None => Ok(ToolResult::error_message(format!(
                "Memory {} not found",
                input.memory_id
            ))),
        }
    }
}
