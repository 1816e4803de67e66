//! Tool system for host agent tool calls
//!
//! This module provides the tool abstraction through which the host agent
//! reaches the memory store.

pub mod definition;
pub mod manager;
pub mod traits;

pub use definition::ToolDefinition;
pub use manager::ToolManager;
pub use traits::{Tool, ToolResult};
