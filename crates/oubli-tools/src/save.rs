//! memory_save tool

use async_trait::async_trait;
use oubli_core::memory::DEFAULT_SOURCE;
use oubli_core::{NewMemory, Result, Tool, ToolResult};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{SharedStore, lock_store, parse_input};

/// Save a new memory to the store
pub struct MemorySaveTool {
    store: SharedStore,
}

impl MemorySaveTool {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize)]
struct SaveInput {
    summary: String,
    #[serde(default)]
    level: u32,
    #[serde(default)]
    full_text: String,
    #[serde(default)]
    topics: Option<Vec<String>>,
    #[serde(default)]
    keywords: Option<Vec<String>>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    parent_ids: Option<Vec<String>>,
}

#[async_trait]
impl Tool for MemorySaveTool {
    fn name(&self) -> &str {
        "memory_save"
    }

    fn description(&self) -> &str {
        "Save a new memory. Level 0 is a raw memory; level 1+ is a synthesized insight \
         built from the memories listed in parent_ids."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "summary": {
                    "type": "string",
                    "description": "Brief summary of the memory"
                },
                "level": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Memory level: 0 for raw, 1+ for synthesized insights"
                },
                "full_text": {
                    "type": "string",
                    "description": "Full text content of the memory"
                },
                "topics": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Topic tags"
                },
                "keywords": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Keywords for search"
                },
                "source": {
                    "type": "string",
                    "description": "Source of the memory: conversation, import or synthesis"
                },
                "parent_ids": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "IDs of the memories this one was synthesized from"
                }
            },
            "required": ["summary"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult> {
        let input: SaveInput = parse_input(self.name(), input)?;

        let new = NewMemory::new(input.summary)
            .with_level(input.level)
            .with_full_text(input.full_text)
            .with_topics(input.topics.unwrap_or_default())
            .with_keywords(input.keywords.unwrap_or_default())
            .with_source(input.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()))
            .with_parent_ids(input.parent_ids.unwrap_or_default());

        let id = lock_store(&self.store)?.add(new)?;
        tracing::debug!(id = %id, "Memory saved");

        ToolResult::json(&json!({ "id": id, "status": "saved" }))
    }
}
