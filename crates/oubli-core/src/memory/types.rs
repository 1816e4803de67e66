//! Memory type definitions for oubli-core

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default source label for memories created during a conversation
pub const DEFAULT_SOURCE: &str = "conversation";

/// A memory entry stored in the system
///
/// Level 0 memories are raw observations from conversations or imports.
/// Level 1 and above are insights synthesized from lower-level memories,
/// linked back to them through `parent_ids`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    /// Unique identifier for the memory
    pub id: String,
    /// Short summary of the memory
    pub summary: String,
    /// Full text content, empty when there is none
    pub full_text: String,
    /// Synthesis depth (0 = raw)
    pub level: u32,
    /// Topic tags
    pub topics: Vec<String>,
    /// Keywords used by search
    pub keywords: Vec<String>,
    /// Where the memory came from ("conversation", "import", "synthesis", ...)
    pub source: String,
    /// Memories this one was synthesized from
    pub parent_ids: Vec<String>,
    /// Memories that reference this one
    pub child_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    /// Number of successful lookups by id
    pub access_count: i64,
    pub synthesis_attempts: i64,
    pub confidence: f64,
    /// Reserved for semantic search; never persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Memory {
    /// Create a new level-0 memory with the given summary
    pub fn new(summary: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            summary: summary.into(),
            full_text: String::new(),
            level: 0,
            topics: Vec::new(),
            keywords: Vec::new(),
            source: DEFAULT_SOURCE.to_string(),
            parent_ids: Vec::new(),
            child_ids: Vec::new(),
            created_at: now,
            updated_at: now,
            last_accessed: now,
            access_count: 0,
            synthesis_attempts: 0,
            confidence: 1.0,
            embedding: None,
        }
    }

    /// Convert to the storage row representation
    ///
    /// Sequence fields are JSON-encoded and the embedding is dropped.
    pub fn to_row(&self) -> Result<MemoryRow> {
        Ok(MemoryRow {
            id: self.id.clone(),
            summary: self.summary.clone(),
            level: self.level,
            full_text: self.full_text.clone(),
            topics: serde_json::to_string(&self.topics)?,
            keywords: serde_json::to_string(&self.keywords)?,
            source: self.source.clone(),
            parent_ids: serde_json::to_string(&self.parent_ids)?,
            child_ids: serde_json::to_string(&self.child_ids)?,
            created_at: format_timestamp(&self.created_at),
            updated_at: format_timestamp(&self.updated_at),
            last_accessed: format_timestamp(&self.last_accessed),
            access_count: self.access_count,
            synthesis_attempts: self.synthesis_attempts,
            confidence: self.confidence,
        })
    }

    /// Rebuild a memory from its storage row
    ///
    /// # Errors
    /// Returns `Error::CorruptRecord` if a sequence or timestamp column
    /// cannot be decoded.
    pub fn from_row(row: MemoryRow) -> Result<Self> {
        let id = row.id;
        let topics = decode_list(&id, "topics", &row.topics)?;
        let keywords = decode_list(&id, "keywords", &row.keywords)?;
        let parent_ids = decode_list(&id, "parent_ids", &row.parent_ids)?;
        let child_ids = decode_list(&id, "child_ids", &row.child_ids)?;
        let created_at = parse_timestamp(&id, "created_at", &row.created_at)?;
        let updated_at = parse_timestamp(&id, "updated_at", &row.updated_at)?;
        let last_accessed = parse_timestamp(&id, "last_accessed", &row.last_accessed)?;

        Ok(Self {
            id,
            summary: row.summary,
            full_text: row.full_text,
            level: row.level,
            topics,
            keywords,
            source: row.source,
            parent_ids,
            child_ids,
            created_at,
            updated_at,
            last_accessed,
            access_count: row.access_count,
            synthesis_attempts: row.synthesis_attempts,
            confidence: row.confidence,
            embedding: None,
        })
    }
}

/// Row representation of a memory in the `memories` table
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryRow {
    pub id: String,
    pub summary: String,
    pub level: u32,
    pub full_text: String,
    /// JSON-encoded list
    pub topics: String,
    /// JSON-encoded list
    pub keywords: String,
    pub source: String,
    /// JSON-encoded list
    pub parent_ids: String,
    /// JSON-encoded list
    pub child_ids: String,
    pub created_at: String,
    pub updated_at: String,
    pub last_accessed: String,
    pub access_count: i64,
    pub synthesis_attempts: i64,
    pub confidence: f64,
}

/// Input for creating a memory
///
/// Everything except `summary` is optional and falls back to the
/// defaults of [`Memory::new`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewMemory {
    pub summary: String,
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub parent_ids: Vec<String>,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

impl NewMemory {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Default::default()
        }
    }

    pub fn with_full_text(mut self, full_text: impl Into<String>) -> Self {
        self.full_text = Some(full_text.into());
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_parent_ids<I, S>(mut self, parent_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parent_ids = parent_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }
}

impl From<NewMemory> for Memory {
    fn from(new: NewMemory) -> Self {
        let mut memory = Memory::new(new.summary);
        memory.full_text = new.full_text.unwrap_or_default();
        memory.level = new.level;
        memory.topics = new.topics;
        memory.keywords = new.keywords;
        if let Some(source) = new.source {
            memory.source = source;
        }
        memory.parent_ids = new.parent_ids;
        memory.embedding = new.embedding;
        memory
    }
}

/// Partial update for an existing memory
///
/// Each supplied field replaces the stored value wholesale; lists are not
/// merged. Fields left as `None` are untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryUpdate {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub topics: Option<Vec<String>>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub parent_ids: Option<Vec<String>>,
    #[serde(default)]
    pub child_ids: Option<Vec<String>>,
}

impl MemoryUpdate {
    /// True when no field is supplied
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.full_text.is_none()
            && self.level.is_none()
            && self.topics.is_none()
            && self.keywords.is_none()
            && self.source.is_none()
            && self.parent_ids.is_none()
            && self.child_ids.is_none()
    }

    /// Replace the supplied fields on `memory`
    ///
    /// Does not touch `updated_at`; the store stamps it when persisting.
    pub fn apply_to(self, memory: &mut Memory) {
        if let Some(summary) = self.summary {
            memory.summary = summary;
        }
        if let Some(full_text) = self.full_text {
            memory.full_text = full_text;
        }
        if let Some(level) = self.level {
            memory.level = level;
        }
        if let Some(topics) = self.topics {
            memory.topics = topics;
        }
        if let Some(keywords) = self.keywords {
            memory.keywords = keywords;
        }
        if let Some(source) = self.source {
            memory.source = source;
        }
        if let Some(parent_ids) = self.parent_ids {
            memory.parent_ids = parent_ids;
        }
        if let Some(child_ids) = self.child_ids {
            memory.child_ids = child_ids;
        }
    }
}

/// Format a timestamp the way it is stored (RFC 3339, UTC, `Z` suffix)
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_timestamp(id: &str, column: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::CorruptRecord {
            id: id.to_string(),
            reason: format!("invalid {} timestamp '{}': {}", column, value, e),
        })
}

fn decode_list(id: &str, column: &str, value: &str) -> Result<Vec<String>> {
    serde_json::from_str(value).map_err(|e| Error::CorruptRecord {
        id: id.to_string(),
        reason: format!("invalid {} encoding: {}", column, e),
    })
}
