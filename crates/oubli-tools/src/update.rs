//! memory_update tool

use async_trait::async_trait;
use oubli_core::{MemoryUpdate, Result, Tool, ToolResult};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{SharedStore, lock_store, parse_input};

/// Replace selected fields of an existing memory
pub struct MemoryUpdateTool {
    store: SharedStore,
}

impl MemoryUpdateTool {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateInput {
    memory_id: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    full_text: Option<String>,
    #[serde(default)]
    topics: Option<Vec<String>>,
    #[serde(default)]
    keywords: Option<Vec<String>>,
    #[serde(default)]
    child_ids: Option<Vec<String>>,
}

impl UpdateInput {
    fn into_update(self) -> (String, MemoryUpdate) {
        let update = MemoryUpdate {
            summary: self.summary,
            full_text: self.full_text,
            topics: self.topics,
            keywords: self.keywords,
            child_ids: self.child_ids,
            ..Default::default()
        };
        (self.memory_id, update)
    }
}

#[async_trait]
impl Tool for MemoryUpdateTool {
    fn name(&self) -> &str {
        "memory_update"
    }

    fn description(&self) -> &str {
        "Update an existing memory. Each supplied field replaces the stored value; \
         omitted fields are left unchanged."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "memory_id": {
                    "type": "string",
                    "description": "The ID of the memory to update"
                },
                "summary": {
                    "type": "string",
                    "description": "New summary"
                },
                "full_text": {
                    "type": "string",
                    "description": "New full text"
                },
                "topics": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "New topics list"
                },
                "keywords": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "New keywords list"
                },
                "child_ids": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "New child IDs list"
                }
            },
            "required": ["memory_id"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult> {
        let input: UpdateInput = parse_input(self.name(), input)?;
        let (id, update) = input.into_update();

        if update.is_empty() {
            return Ok(ToolResult::error_message("No updates provided"));
        }

        if lock_store(&self.store)?.update(&id, update)? {
            ToolResult::json(&json!({ "status": "updated", "id": id }))
        } else {
            Ok(ToolResult::error_message(format!("Memory {} not found", id)))
        }
    }
}
