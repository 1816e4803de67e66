//! memory_delete tool

use async_trait::async_trait;
use oubli_core::{Result, Tool, ToolResult};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{SharedStore, lock_store, parse_input};

/// Delete a memory by ID
pub struct MemoryDeleteTool {
    store: SharedStore,
}

impl MemoryDeleteTool {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize)]
struct DeleteInput {
    memory_id: String,
}

#[async_trait]
impl Tool for MemoryDeleteTool {
    fn name(&self) -> &str {
        "memory_delete"
    }

    fn description(&self) -> &str {
        "Delete a memory by ID. Use this when information becomes outdated or incorrect, \
         e.g. search for memories about a former job and delete them."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "memory_id": {
                    "type": "string",
                    "description": "The ID of the memory to delete"
                }
            },
            "required": ["memory_id"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult> {
        let input: DeleteInput = parse_input(self.name(), input)?;

        if lock_store(&self.store)?.delete(&input.memory_id)? {
            ToolResult::json(&json!({ "status": "deleted", "id": input.memory_id }))
        } else {
            Ok(ToolResult::error_message(format!(
                "Memory {} not found",
                input.memory_id
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use oubli_core::NewMemory;

    #[tokio::test]
    async fn test_delete_then_get() {
        let store = test_support::store();
        let id = store.lock().unwrap().add(NewMemory::new("Works at Acme")).unwrap();

        let tool = MemoryDeleteTool::new(store.clone());
        let result = tool.execute(json!({"memory_id": id})).await.unwrap();
        assert!(!result.is_error);
        assert_eq!(
            result.output_json().unwrap(),
            json!({"status": "deleted", "id": id})
        );
        assert!(store.lock().unwrap().get(&id).unwrap().is_none());

        let again = tool.execute(json!({"memory_id": id})).await.unwrap();
        assert!(again.is_error);
    }
}
