//! memory_import tool
//!
//! Bulk import of memories the agent has already parsed out of some
//! external text (chat exports, notes). Entries without a summary are
//! skipped rather than failing the batch.

use async_trait::async_trait;
use oubli_core::{NewMemory, Result, Tool, ToolResult};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{SharedStore, lock_store, parse_input};

const DEFAULT_SOURCE: &str = "import";

/// Import several memories at once
pub struct MemoryImportTool {
    store: SharedStore,
}

impl MemoryImportTool {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize)]
struct ImportInput {
    memories: Vec<ImportEntry>,
    #[serde(default = "default_source")]
    source: String,
}

#[derive(Debug, Deserialize)]
struct ImportEntry {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    full_text: Option<String>,
    #[serde(default)]
    topics: Option<Vec<String>>,
    #[serde(default)]
    keywords: Option<Vec<String>>,
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

#[async_trait]
impl Tool for MemoryImportTool {
    fn name(&self) -> &str {
        "memory_import"
    }

    fn description(&self) -> &str {
        "Import multiple pre-parsed memories at once. Each entry needs a summary and may \
         carry full_text, topics and keywords. All entries are saved as level 0."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "memories": {
                    "type": "array",
                    "description": "Memories to import",
                    "items": {
                        "type": "object",
                        "properties": {
                            "summary": { "type": "string" },
                            "full_text": { "type": "string" },
                            "topics": { "type": "array", "items": { "type": "string" } },
                            "keywords": { "type": "array", "items": { "type": "string" } }
                        }
                    }
                },
                "source": {
                    "type": "string",
                    "description": "Source label for every imported memory (default: import)"
                }
            },
            "required": ["memories"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult> {
        let input: ImportInput = parse_input(self.name(), input)?;
        let total = input.memories.len();

        let store = lock_store(&self.store)?;
        let mut ids = Vec::new();

        for entry in input.memories {
            let Some(summary) = entry.summary.filter(|s| !s.is_empty()) else {
                continue;
            };

            let new = NewMemory::new(summary)
                .with_full_text(entry.full_text.unwrap_or_default())
                .with_topics(entry.topics.unwrap_or_default())
                .with_keywords(entry.keywords.unwrap_or_default())
                .with_source(input.source.clone());

            ids.push(store.add(new)?);
        }
        drop(store);

        tracing::info!(imported = ids.len(), skipped = total - ids.len(), "Imported memories");

        ToolResult::json(&json!({
            "status": "imported",
            "count": ids.len(),
            "ids": ids,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn test_import_skips_entries_without_summary() {
        let store = test_support::store();
        let tool = MemoryImportTool::new(store.clone());

        let output = tool
            .execute(json!({
                "memories": [
                    {"summary": "A"},
                    {"full_text": "no summary here"},
                    {"summary": ""},
                    {"summary": "B", "topics": ["letters"], "keywords": ["b"]}
                ]
            }))
            .await
            .unwrap()
            .output_json()
            .unwrap();

        assert_eq!(output["status"], "imported");
        assert_eq!(output["count"], 2);
        assert_eq!(output["ids"].as_array().unwrap().len(), 2);

        let memories = store.lock().unwrap().get_all(10).unwrap();
        let summaries: Vec<&str> = memories.iter().map(|m| m.summary.as_str()).collect();
        assert_eq!(summaries, vec!["A", "B"]);
        assert!(memories.iter().all(|m| m.source == "import" && m.level == 0));
        assert_eq!(memories[1].topics, vec!["letters"]);
    }

    #[tokio::test]
    async fn test_import_custom_source() {
        let store = test_support::store();
        let tool = MemoryImportTool::new(store.clone());

        tool.execute(json!({
            "memories": [{"summary": "From my notes"}],
            "source": "notes"
        }))
        .await
        .unwrap();

        let memories = store.lock().unwrap().get_all(10).unwrap();
        assert_eq!(memories[0].source, "notes");
    }

    #[tokio::test]
    async fn test_import_empty_batch() {
        let tool = MemoryImportTool::new(test_support::store());
        let output = tool
            .execute(json!({"memories": []}))
            .await
            .unwrap()
            .output_json()
            .unwrap();
        assert_eq!(output, json!({"status": "imported", "count": 0, "ids": []}));
    }
}
