//! Memory storage implementation using SQLite

use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Params, Row, params};
use tracing::{debug, info};

use crate::memory::search::{self, SEARCH_SCAN_LIMIT, ScoredMemory};
use crate::memory::types::format_timestamp;
use crate::memory::{Memory, MemoryRow, MemoryStats, MemoryUpdate, NewMemory};
use crate::{Error, Result};

const COLUMNS: &str = "id, summary, level, full_text, topics, keywords, source, \
     parent_ids, child_ids, created_at, updated_at, last_accessed, \
     access_count, synthesis_attempts, confidence";

/// SQLite-based storage for memories
///
/// Every operation runs to completion on the calling thread. Share a store
/// between tasks behind a mutex.
pub struct MemoryStore {
    conn: Connection,
}

impl MemoryStore {
    /// Open (or create) a MemoryStore at the given database path
    ///
    /// Missing parent directories are created.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        debug!("Opening memory database at: {}", db_path.display());

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;
        let store = Self { conn };
        store.init_tables()?;
        info!("MemoryStore initialized successfully");
        Ok(store)
    }

    /// Create an in-memory MemoryStore (useful for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_tables()?;
        Ok(store)
    }

    /// Initialize database tables
    fn init_tables(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS memories (
                id TEXT PRIMARY KEY,
                summary TEXT NOT NULL,
                level INTEGER NOT NULL DEFAULT 0,
                full_text TEXT NOT NULL DEFAULT '',
                topics TEXT NOT NULL DEFAULT '[]',
                keywords TEXT NOT NULL DEFAULT '[]',
                source TEXT NOT NULL,
                parent_ids TEXT NOT NULL DEFAULT '[]',
                child_ids TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                last_accessed TEXT NOT NULL,
                access_count INTEGER NOT NULL DEFAULT 0,
                synthesis_attempts INTEGER NOT NULL DEFAULT 0,
                confidence REAL NOT NULL DEFAULT 1.0
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_memories_level ON memories(level)",
            [],
        )?;

        Ok(())
    }

    /// Add a new memory and return its freshly minted ID
    pub fn add(&self, new: NewMemory) -> Result<String> {
        let memory = Memory::from(new);
        let row = memory.to_row()?;

        self.conn.execute(
            &format!(
                "INSERT INTO memories ({COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
            ),
            params![
                row.id,
                row.summary,
                row.level,
                row.full_text,
                row.topics,
                row.keywords,
                row.source,
                row.parent_ids,
                row.child_ids,
                row.created_at,
                row.updated_at,
                row.last_accessed,
                row.access_count,
                row.synthesis_attempts,
                row.confidence,
            ],
        )?;

        debug!("Saved memory with id: {}", memory.id);
        Ok(memory.id)
    }

    /// Get a memory by ID, recording the access
    ///
    /// On a hit, `access_count` is incremented and `last_accessed` refreshed
    /// in place. The returned memory is the snapshot read before that
    /// bookkeeping.
    pub fn get(&self, id: &str) -> Result<Option<Memory>> {
        let tx = self.conn.unchecked_transaction()?;

        let Some(memory) = load(&tx, id)? else {
            return Ok(None);
        };

        tx.execute(
            "UPDATE memories
             SET access_count = access_count + 1, last_accessed = ?1
             WHERE id = ?2",
            params![format_timestamp(&Utc::now()), id],
        )?;
        tx.commit()?;

        Ok(Some(memory))
    }

    /// Get up to `limit` memories in storage order
    pub fn get_all(&self, limit: usize) -> Result<Vec<Memory>> {
        query_memories(
            &self.conn,
            &format!("SELECT {COLUMNS} FROM memories ORDER BY rowid LIMIT ?1"),
            params![sql_limit(limit)],
        )
    }

    /// Get up to `limit` memories at a specific level, in storage order
    pub fn get_by_level(&self, level: u32, limit: usize) -> Result<Vec<Memory>> {
        query_memories(
            &self.conn,
            &format!("SELECT {COLUMNS} FROM memories WHERE level = ?1 ORDER BY rowid LIMIT ?2"),
            params![level, sql_limit(limit)],
        )
    }

    /// Search memories by keyword relevance
    ///
    /// See [`search::rank`] for the scoring rules.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<Memory>> {
        let memories = self
            .search_scored(query, limit)?
            .into_iter()
            .map(|scored| scored.memory)
            .collect();
        Ok(memories)
    }

    /// Search memories, keeping the relevance score of each result
    pub fn search_scored(&self, query: &str, limit: usize) -> Result<Vec<ScoredMemory>> {
        let candidates = self.get_all(SEARCH_SCAN_LIMIT)?;
        let results = search::rank(candidates, query, limit);
        debug!("Found {} memories matching query: {}", results.len(), query);
        Ok(results)
    }

    /// Update the supplied fields of a memory
    ///
    /// Returns `Ok(false)` when no memory has the given ID.
    ///
    /// # Errors
    /// Returns `Error::EmptyUpdate` without touching storage when the update
    /// carries no fields.
    pub fn update(&self, id: &str, update: MemoryUpdate) -> Result<bool> {
        if update.is_empty() {
            return Err(Error::EmptyUpdate);
        }

        let tx = self.conn.unchecked_transaction()?;

        let Some(mut memory) = load(&tx, id)? else {
            debug!("No memory to update with id: {}", id);
            return Ok(false);
        };

        update.apply_to(&mut memory);
        memory.updated_at = Utc::now();
        let row = memory.to_row()?;

        tx.execute(
            "UPDATE memories
             SET summary = ?1, level = ?2, full_text = ?3, topics = ?4, keywords = ?5,
                 source = ?6, parent_ids = ?7, child_ids = ?8, updated_at = ?9
             WHERE id = ?10",
            params![
                row.summary,
                row.level,
                row.full_text,
                row.topics,
                row.keywords,
                row.source,
                row.parent_ids,
                row.child_ids,
                row.updated_at,
                id,
            ],
        )?;
        tx.commit()?;

        debug!("Updated memory with id: {}", id);
        Ok(true)
    }

    /// Delete a memory by ID
    ///
    /// Returns `true` if a memory was removed.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM memories WHERE id = ?1", params![id])?;

        if rows_affected > 0 {
            debug!("Deleted memory with id: {}", id);
        }
        Ok(rows_affected > 0)
    }

    /// Delete every memory, returning how many were removed
    pub fn delete_all(&self) -> Result<usize> {
        let count = self.conn.execute("DELETE FROM memories", [])?;
        self.init_tables()?;
        info!("Cleared {} memories", count);
        Ok(count)
    }

    /// Compute statistics over every stored memory
    pub fn get_stats(&self) -> Result<MemoryStats> {
        let memories = query_memories(
            &self.conn,
            &format!("SELECT {COLUMNS} FROM memories ORDER BY rowid"),
            [],
        )?;
        Ok(memories.iter().collect())
    }

    /// Count total memories
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM memories", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Load a memory by ID without access tracking
fn load(conn: &Connection, id: &str) -> Result<Option<Memory>> {
    let row = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM memories WHERE id = ?1"),
            params![id],
            read_row,
        )
        .optional()?;

    row.map(Memory::from_row).transpose()
}

/// Run a query and decode every row
///
/// Fails as a whole if any row cannot be decoded.
fn query_memories<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<Memory>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, read_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter().map(Memory::from_row).collect()
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<MemoryRow> {
    Ok(MemoryRow {
        id: row.get(0)?,
        summary: row.get(1)?,
        level: row.get(2)?,
        full_text: row.get(3)?,
        topics: row.get(4)?,
        keywords: row.get(5)?,
        source: row.get(6)?,
        parent_ids: row.get(7)?,
        child_ids: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
        last_accessed: row.get(11)?,
        access_count: row.get(12)?,
        synthesis_attempts: row.get(13)?,
        confidence: row.get(14)?,
    })
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}
