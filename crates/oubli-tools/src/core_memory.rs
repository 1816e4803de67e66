//! core_memory_get / core_memory_save tools

use async_trait::async_trait;
use oubli_core::{CoreMemory, Result, Tool, ToolResult};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::parse_input;

/// Read the core memory document
pub struct CoreMemoryGetTool {
    core: CoreMemory,
}

impl CoreMemoryGetTool {
    pub fn new(core: CoreMemory) -> Self {
        Self { core }
    }
}

#[async_trait]
impl Tool for CoreMemoryGetTool {
    fn name(&self) -> &str {
        "core_memory_get"
    }

    fn description(&self) -> &str {
        "Get the core memory: a markdown document with the most important information \
         about the user, loaded at the start of every session."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _input: Value) -> Result<ToolResult> {
        let exists = self.core.exists();
        let content = if exists { self.core.load()? } else { String::new() };

        ToolResult::json(&json!({ "exists": exists, "content": content }))
    }
}

/// Replace the core memory document
pub struct CoreMemorySaveTool {
    core: CoreMemory,
}

impl CoreMemorySaveTool {
    pub fn new(core: CoreMemory) -> Self {
        Self { core }
    }
}

#[derive(Debug, Deserialize)]
struct SaveInput {
    content: String,
}

#[async_trait]
impl Tool for CoreMemorySaveTool {
    fn name(&self) -> &str {
        "core_memory_save"
    }

    fn description(&self) -> &str {
        "Replace the whole core memory document. Build it by organizing the most \
         important memories into structured markdown."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The markdown content to save as core memory"
                }
            },
            "required": ["content"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult> {
        let input: SaveInput = parse_input(self.name(), input)?;
        self.core.save(&input.content)?;

        ToolResult::json(&json!({
            "status": "saved",
            "length": input.content.chars().count(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_core_memory_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let core = CoreMemory::new(dir.path().join("core_memory.md"));
        let get = CoreMemoryGetTool::new(core.clone());
        let save = CoreMemorySaveTool::new(core);

        let output = get.execute(json!({})).await.unwrap().output_json().unwrap();
        assert_eq!(output, json!({"exists": false, "content": ""}));

        let output = save
            .execute(json!({"content": "# Core\n\nPrefers café au lait"}))
            .await
            .unwrap()
            .output_json()
            .unwrap();
        assert_eq!(output["status"], "saved");
        assert_eq!(output["length"], 28);

        let output = get.execute(json!({})).await.unwrap().output_json().unwrap();
        assert_eq!(output["exists"], true);
        assert_eq!(output["content"], "# Core\n\nPrefers café au lait");
    }

    #[tokio::test]
    async fn test_core_memory_save_requires_content() {
        let dir = tempfile::tempdir().unwrap();
        let save = CoreMemorySaveTool::new(CoreMemory::new(dir.path().join("core.md")));
        assert!(save.execute(json!({})).await.is_err());
    }
}
