//! Aggregate statistics over the memory store

use std::collections::BTreeMap;

use serde::Serialize;

use crate::memory::Memory;

/// Snapshot of store contents, computed fresh from a full scan
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemoryStats {
    pub total: usize,
    pub by_level: BTreeMap<u32, usize>,
    /// Every topic occurrence counts, including repeats within one memory
    pub by_topic: BTreeMap<String, usize>,
    pub by_source: BTreeMap<String, usize>,
}

impl MemoryStats {
    /// Fold a single memory into the counts
    pub fn record(&mut self, memory: &Memory) {
        self.total += 1;
        *self.by_level.entry(memory.level).or_default() += 1;
        for topic in &memory.topics {
            *self.by_topic.entry(topic.clone()).or_default() += 1;
        }
        *self.by_source.entry(memory.source.clone()).or_default() += 1;
    }
}

impl<'a> FromIterator<&'a Memory> for MemoryStats {
    fn from_iter<I: IntoIterator<Item = &'a Memory>>(iter: I) -> Self {
        let mut stats = Self::default();
        for memory in iter {
            stats.record(memory);
        }
        stats
    }
}
