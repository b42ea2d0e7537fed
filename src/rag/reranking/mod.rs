// Second-pass reranking of retrieved candidates
pub mod cohere;
pub mod scorer;

use async_trait::async_trait;

use crate::errors::Result;
use crate::types::EvidenceChunk;

pub use cohere::CohereReranker;
pub use scorer::{KeywordReranker, ReRankConfig, RankingStrategy};

/// Reorders candidates by relevance to the query and keeps the best `top_n`
#[async_trait]
pub trait Reranker: Send + Sync {
    async fn rerank(
        &self,
        query: &str,
        candidates: Vec<EvidenceChunk>,
        top_n: usize,
    ) -> Result<Vec<EvidenceChunk>>;
}
