//! Keyword relevance ranking
//!
//! Lexical substring matching over summary, full text, keywords and
//! topics. There is no stemming or similarity: a query matches only where
//! it literally appears (ignoring case).

use crate::memory::Memory;

/// Maximum number of records scanned per search, regardless of the
/// requested result limit
pub const SEARCH_SCAN_LIMIT: usize = 1000;

const SUMMARY_WEIGHT: u32 = 2;
const FULL_TEXT_WEIGHT: u32 = 1;
const KEYWORD_WEIGHT: u32 = 1;
const TOPIC_WEIGHT: u32 = 1;

/// A memory paired with its relevance score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMemory {
    pub score: u32,
    pub memory: Memory,
}

/// Score a memory against an already lower-cased query
pub fn score(memory: &Memory, query_lower: &str) -> u32 {
    let mut score = 0;

    if memory.summary.to_lowercase().contains(query_lower) {
        score += SUMMARY_WEIGHT;
    }
    if !memory.full_text.is_empty() && memory.full_text.to_lowercase().contains(query_lower) {
        score += FULL_TEXT_WEIGHT;
    }
    for keyword in &memory.keywords {
        if keyword.to_lowercase().contains(query_lower) {
            score += KEYWORD_WEIGHT;
        }
    }
    for topic in &memory.topics {
        if topic.to_lowercase().contains(query_lower) {
            score += TOPIC_WEIGHT;
        }
    }

    score
}

/// Rank memories against `query` and keep the best `limit`
///
/// Zero-score memories are dropped. The sort is stable, so equal scores
/// keep the order in which `memories` was given.
pub fn rank(memories: Vec<Memory>, query: &str, limit: usize) -> Vec<ScoredMemory> {
    let query_lower = query.to_lowercase();

    let mut matches: Vec<ScoredMemory> = memories
        .into_iter()
        .filter_map(|memory| {
            let score = score(&memory, &query_lower);
            (score > 0).then_some(ScoredMemory { score, memory })
        })
        .collect();

    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches.truncate(limit);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::NewMemory;

    fn memory(new: NewMemory) -> Memory {
        new.into()
    }

    #[test]
    fn test_score_weights() {
        let m = memory(
            NewMemory::new("Rust notes")
                .with_full_text("Learning rust ownership")
                .with_keywords(["rust", "RUSTACEAN", "cargo"])
                .with_topics(["Rust", "programming"]),
        );
        // summary 2 + full_text 1 + two keywords + one topic
        assert_eq!(score(&m, "rust"), 6);
        assert_eq!(score(&m, "python"), 0);
    }

    #[test]
    fn test_empty_full_text_never_scores() {
        let m = memory(NewMemory::new("nothing here"));
        assert_eq!(score(&m, ""), 2);
    }

    #[test]
    fn test_rank_alice_scenario() {
        let m = memory(NewMemory::new("met Alice at the park").with_keywords(["Alice"]));
        let ranked = rank(vec![m], "alice", 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].score, 3);
    }

    #[test]
    fn test_rank_orders_by_score_and_keeps_ties_stable() {
        let low_first = memory(NewMemory::new("other").with_topics(["coffee"]));
        let high = memory(NewMemory::new("coffee break").with_keywords(["coffee"]));
        let low_second = memory(NewMemory::new("tea").with_keywords(["coffee beans"]));
        let miss = memory(NewMemory::new("unrelated"));

        let ranked = rank(
            vec![low_first.clone(), high.clone(), miss, low_second.clone()],
            "Coffee",
            10,
        );

        let ids: Vec<&str> = ranked.iter().map(|s| s.memory.id.as_str()).collect();
        assert_eq!(ids, vec![high.id.as_str(), low_first.id.as_str(), low_second.id.as_str()]);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(ranked.iter().all(|s| s.score > 0));
    }

    #[test]
    fn test_rank_truncates_to_limit() {
        let memories = (0..5)
            .map(|i| memory(NewMemory::new(format!("note {}", i))))
            .collect();
        assert_eq!(rank(memories, "note", 2).len(), 2);
    }
}
