//! Memory system for oubli-core
//!
//! This module provides persistent storage for memories using SQLite as
//! the backend, with keyword relevance search and aggregate statistics.

pub mod search;
mod stats;
mod store;
mod types;

pub use search::{SEARCH_SCAN_LIMIT, ScoredMemory};
pub use stats::MemoryStats;
pub use store::MemoryStore;
pub use types::{DEFAULT_SOURCE, Memory, MemoryRow, MemoryUpdate, NewMemory};
