// Vector retrieval seam
pub mod qdrant;

use async_trait::async_trait;

use crate::errors::Result;
use crate::types::EvidenceChunk;

pub use qdrant::{probe_collection, QdrantRetriever};

/// Similarity search over the pre-built manual index
#[async_trait]
pub trait VectorRetriever: Send + Sync {
    /// Return up to `top_k` chunks, most similar first
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<EvidenceChunk>>;
}
