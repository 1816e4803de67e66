//! oubli-tools: memory tools for the host agent
//!
//! Each tool wraps one memory store or core memory operation, taking a
//! JSON input and returning JSON text.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use oubli_core::{CoreMemory, Error, Memory, MemoryStore, Result, ToolManager};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

pub mod core_memory;
pub mod delete;
pub mod get;
pub mod import;
pub mod list;
pub mod save;
pub mod search;
pub mod stats;
pub mod update;

pub use core_memory::{CoreMemoryGetTool, CoreMemorySaveTool};
pub use delete::MemoryDeleteTool;
pub use get::MemoryGetTool;
pub use import::MemoryImportTool;
pub use list::MemoryListTool;
pub use save::MemorySaveTool;
pub use search::MemorySearchTool;
pub use stats::MemoryStatsTool;
pub use update::MemoryUpdateTool;

/// Store handle shared by every tool
///
/// Created once at startup; each tool call holds the lock for the whole
/// store operation.
pub type SharedStore = Arc<Mutex<MemoryStore>>;

/// Wrap a store for sharing between tools
pub fn shared_store(store: MemoryStore) -> SharedStore {
    Arc::new(Mutex::new(store))
}

/// Register all memory and core memory tools with the tool manager
pub fn register_memory_tools(manager: &mut ToolManager, store: SharedStore, core: CoreMemory) {
    manager.register(Arc::new(MemorySaveTool::new(store.clone())));
    manager.register(Arc::new(MemorySearchTool::new(store.clone())));
    manager.register(Arc::new(MemoryGetTool::new(store.clone())));
    manager.register(Arc::new(MemoryListTool::new(store.clone())));
    manager.register(Arc::new(MemoryStatsTool::new(store.clone())));
    manager.register(Arc::new(MemoryUpdateTool::new(store.clone())));
    manager.register(Arc::new(MemoryDeleteTool::new(store.clone())));
    manager.register(Arc::new(MemoryImportTool::new(store)));
    manager.register(Arc::new(CoreMemoryGetTool::new(core.clone())));
    manager.register(Arc::new(CoreMemorySaveTool::new(core)));
}

/// Compact view of a memory used by search and list results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryBrief {
    pub id: String,
    pub summary: String,
    pub level: u32,
    pub topics: Vec<String>,
    pub source: String,
}

impl From<Memory> for MemoryBrief {
    fn from(memory: Memory) -> Self {
        Self {
            id: memory.id,
            summary: memory.summary,
            level: memory.level,
            topics: memory.topics,
            source: memory.source,
        }
    }
}

/// Full view of a memory returned by `memory_get`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryDetail {
    pub id: String,
    pub summary: String,
    pub full_text: String,
    pub level: u32,
    pub topics: Vec<String>,
    pub keywords: Vec<String>,
    pub source: String,
    pub parent_ids: Vec<String>,
    pub child_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub access_count: i64,
}

impl From<Memory> for MemoryDetail {
    fn from(memory: Memory) -> Self {
        Self {
            id: memory.id,
            summary: memory.summary,
            full_text: memory.full_text,
            level: memory.level,
            topics: memory.topics,
            keywords: memory.keywords,
            source: memory.source,
            parent_ids: memory.parent_ids,
            child_ids: memory.child_ids,
            created_at: memory.created_at,
            access_count: memory.access_count,
        }
    }
}

/// Deserialize tool input into its typed parameters
pub(crate) fn parse_input<T: DeserializeOwned>(tool: &str, input: JsonValue) -> Result<T> {
    // Tools without parameters may be called with `null`
    let input = if input.is_null() {
        JsonValue::Object(Default::default())
    } else {
        input
    };
    serde_json::from_value(input)
        .map_err(|e| Error::ToolExecution(format!("Invalid input for {}: {}", tool, e)))
}

/// Lock the shared store
pub(crate) fn lock_store(store: &SharedStore) -> Result<MutexGuard<'_, MemoryStore>> {
    store
        .lock()
        .map_err(|_| Error::Other("memory store lock poisoned".to_string()))
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_register_memory_tools() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = ToolManager::new();
        register_memory_tools(
            &mut manager,
            test_support::store(),
            CoreMemory::new(dir.path().join("core_memory.md")),
        );

        assert_eq!(
            manager.tool_names(),
            vec![
                "core_memory_get",
                "core_memory_save",
                "memory_delete",
                "memory_get",
                "memory_import",
                "memory_list",
                "memory_save",
                "memory_search",
                "memory_stats",
                "memory_update",
            ]
        );
    }

    #[tokio::test]
    async fn test_save_search_get_through_manager() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = ToolManager::new();
        register_memory_tools(
            &mut manager,
            test_support::store(),
            CoreMemory::new(dir.path().join("core_memory.md")),
        );

        let saved = manager
            .execute(
                "memory_save",
                json!({"summary": "met Alice at the park", "keywords": ["Alice"]}),
            )
            .await
            .unwrap()
            .output_json()
            .unwrap();
        let id = saved["id"].as_str().unwrap().to_string();

        let found = manager
            .execute("memory_search", json!({"query": "alice"}))
            .await
            .unwrap()
            .output_json()
            .unwrap();
        assert_eq!(found[0]["id"], id.as_str());

        let detail = manager
            .execute("memory_get", json!({"memory_id": id}))
            .await
            .unwrap()
            .output_json()
            .unwrap();
        assert_eq!(detail["keywords"], json!(["Alice"]));
    }
}
