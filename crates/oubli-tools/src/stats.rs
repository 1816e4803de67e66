//! memory_stats tool

use async_trait::async_trait;
use oubli_core::{Result, Tool, ToolResult};
use serde_json::{Value, json};

use crate::{SharedStore, lock_store};

/// Report counts by level, topic and source
pub struct MemoryStatsTool {
    store: SharedStore,
}

impl MemoryStatsTool {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for MemoryStatsTool {
    fn name(&self) -> &str {
        "memory_stats"
    }

    fn description(&self) -> &str {
        "Get statistics about the memory store: total count and counts by level, topic and source."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _input: Value) -> Result<ToolResult> {
        let stats = lock_store(&self.store)?.get_stats()?;
        ToolResult::json(&stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use oubli_core::NewMemory;

    #[tokio::test]
    async fn test_stats_output() {
        let store = test_support::store();
        {
            let store = store.lock().unwrap();
            store.add(NewMemory::new("a").with_topics(["work"])).unwrap();
            store
                .add(NewMemory::new("b").with_topics(["work", "travel"]).with_source("import"))
                .unwrap();
            store.add(NewMemory::new("c").with_level(1)).unwrap();
        }

        let tool = MemoryStatsTool::new(store);
        let output = tool.execute(json!({})).await.unwrap().output_json().unwrap();

        assert_eq!(output["total"], 3);
        assert_eq!(output["by_level"], json!({"0": 2, "1": 1}));
        assert_eq!(output["by_topic"], json!({"travel": 1, "work": 2}));
        assert_eq!(output["by_source"], json!({"conversation": 2, "import": 1}));
    }

    #[tokio::test]
    async fn test_stats_empty_store() {
        let tool = MemoryStatsTool::new(test_support::store());
        let output = tool.execute(Value::Null).await.unwrap().output_json().unwrap();
        assert_eq!(
            output,
            json!({"total": 0, "by_level": {}, "by_topic": {}, "by_source": {}})
        );
    }
}
