// Local re-ranking scorer, used when no hosted reranker is configured
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::rag::reranking::Reranker;
use crate::types::EvidenceChunk;

/// Re-ranking strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankingStrategy {
    /// Use original similarity scores only
    Similarity,
    /// Similarity plus boost for query terms found in the chunk
    KeywordBoost,
}

/// Re-ranking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReRankConfig {
    /// Ranking strategy to use
    pub strategy: RankingStrategy,
    /// Maximum boost for exact keyword matches
    pub keyword_boost: f32,
    /// Query words shorter than this are ignored
    pub min_word_len: usize,
}

impl Default for ReRankConfig {
    fn default() -> Self {
        Self {
            strategy: RankingStrategy::KeywordBoost,
            keyword_boost: 0.1,
            min_word_len: 3,
        }
    }
}

/// Keyword-aware reranker
pub struct KeywordReranker {
    config: ReRankConfig,
}

impl KeywordReranker {
    /// Create new re-ranker with default config
    pub fn new() -> Self {
        Self {
            config: ReRankConfig::default(),
        }
    }

    /// Create with custom configuration
    pub fn with_config(config: ReRankConfig) -> Self {
        Self { config }
    }

    /// Score, sort descending and truncate
    pub fn rank(&self, query: &str, candidates: Vec<EvidenceChunk>, top_n: usize) -> Vec<EvidenceChunk> {
        let mut scored: Vec<(f32, EvidenceChunk)> = candidates
            .into_iter()
            .map(|chunk| (self.compute_score(&chunk, query), chunk))
            .collect();

        // Stable sort keeps index order among ties
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_n);

        scored
            .into_iter()
            .map(|(score, chunk)| chunk.reranked(score))
            .collect()
    }

    /// Compute reranked score for a chunk
    fn compute_score(&self, chunk: &EvidenceChunk, query: &str) -> f32 {
        let base_score = chunk.score.unwrap_or(0.0);

        match self.config.strategy {
            RankingStrategy::Similarity => base_score,
            RankingStrategy::KeywordBoost => {
                let boosted = base_score + self.compute_keyword_boost(chunk, query);
                boosted.min(1.0)
            }
        }
    }

    /// Compute keyword boost for exact matches
    fn compute_keyword_boost(&self, chunk: &EvidenceChunk, query: &str) -> f32 {
        let query_lower = query.to_lowercase();
        let content_lower = chunk.text.to_lowercase();

        let query_words: Vec<&str> = query_lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        if query_words.is_empty() {
            return 0.0;
        }

        let matches = query_words
            .iter()
            .filter(|word| word.chars().count() >= self.config.min_word_len && content_lower.contains(*word))
            .count();

        let boost_per_match = self.config.keyword_boost / query_words.len() as f32;
        (matches as f32 * boost_per_match).min(self.config.keyword_boost)
    }

    /// Get current configuration
    pub fn config(&self) -> &ReRankConfig {
        &self.config
    }
}

impl Default for KeywordReranker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Reranker for KeywordReranker {
    async fn rerank(
        &self,
        query: &str,
        candidates: Vec<EvidenceChunk>,
        top_n: usize,
    ) -> Result<Vec<EvidenceChunk>> {
        Ok(self.rank(query, candidates, top_n))
    }
}
