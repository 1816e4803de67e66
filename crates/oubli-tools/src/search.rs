//! memory_search tool

use async_trait::async_trait;
use oubli_core::{Result, Tool, ToolResult};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{MemoryBrief, SharedStore, lock_store, parse_input};

const DEFAULT_LIMIT: usize = 5;

/// Search memories by keyword relevance
pub struct MemorySearchTool {
    store: SharedStore,
}

impl MemorySearchTool {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize)]
struct SearchInput {
    query: String,
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default)]
    min_level: u32,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

#[async_trait]
impl Tool for MemorySearchTool {
    fn name(&self) -> &str {
        "memory_search"
    }

    fn description(&self) -> &str {
        "Search memories by keyword. Matches the query (case-insensitive) against summaries, \
         full text, keywords and topics, best matches first."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query string"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Maximum number of results to return (default 5)"
                },
                "min_level": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Minimum memory level to include (default 0)"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult> {
        let input: SearchInput = parse_input(self.name(), input)?;

        // Over-fetch so the level filter still leaves enough results
        let results = lock_store(&self.store)?.search(&input.query, input.limit.saturating_mul(2))?;

        let briefs: Vec<MemoryBrief> = results
            .into_iter()
            .filter(|m| m.level >= input.min_level)
            .take(input.limit)
            .map(MemoryBrief::from)
            .collect();

        tracing::debug!(query = %input.query, results = briefs.len(), "Memory search");
        ToolResult::json(&briefs)
    }
}
