//! memory_list tool

use async_trait::async_trait;
use oubli_core::{Result, Tool, ToolResult};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{MemoryBrief, SharedStore, lock_store, parse_input};

const DEFAULT_LIMIT: usize = 50;

/// List memories, optionally at a single level
pub struct MemoryListTool {
    store: SharedStore,
}

impl MemoryListTool {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize)]
struct ListInput {
    #[serde(default)]
    level: Option<u32>,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

#[async_trait]
impl Tool for MemoryListTool {
    fn name(&self) -> &str {
        "memory_list"
    }

    fn description(&self) -> &str {
        "List memories in storage order, optionally only those at one level."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "level": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Only return memories at this level"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Maximum number of memories to return (default 50)"
                }
            }
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult> {
        let input: ListInput = parse_input(self.name(), input)?;

        let memories = {
            let store = lock_store(&self.store)?;
            match input.level {
                Some(level) => store.get_by_level(level, input.limit)?,
                None => store.get_all(input.limit)?,
            }
        };

        let briefs: Vec<MemoryBrief> = memories.into_iter().map(MemoryBrief::from).collect();
        ToolResult::json(&briefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use oubli_core::NewMemory;

    #[tokio::test]
    async fn test_list_by_level() {
        let store = test_support::store();
        {
            let store = store.lock().unwrap();
            store.add(NewMemory::new("raw a")).unwrap();
            store.add(NewMemory::new("raw b")).unwrap();
            store.add(NewMemory::new("insight").with_level(1)).unwrap();
        }

        let tool = MemoryListTool::new(store);

        let all = tool.execute(Value::Null).await.unwrap().output_json().unwrap();
        assert_eq!(all.as_array().unwrap().len(), 3);

        let raw = tool
            .execute(json!({"level": 0}))
            .await
            .unwrap()
            .output_json()
            .unwrap();
        let summaries: Vec<&str> = raw
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["summary"].as_str().unwrap())
            .collect();
        assert_eq!(summaries, vec!["raw a", "raw b"]);

        let limited = tool
            .execute(json!({"limit": 1}))
            .await
            .unwrap()
            .output_json()
            .unwrap();
        assert_eq!(limited.as_array().unwrap().len(), 1);
    }
}
