//! oubli-core: persistent memory store for conversational agents
//!
//! Provides the memory record store (SQLite), keyword search, statistics,
//! the core memory document, configuration, and the tool abstraction used
//! to expose these to a host agent.

pub mod config;
pub mod core_memory;
pub mod error;
pub mod memory;
pub mod tool;

pub use config::{Config, CoreMemoryConfig, MemoryConfig};
pub use core_memory::CoreMemory;
pub use error::{Error, Result};
pub use memory::{Memory, MemoryStats, MemoryStore, MemoryUpdate, NewMemory};
pub use tool::{Tool, ToolDefinition, ToolManager, ToolResult};
