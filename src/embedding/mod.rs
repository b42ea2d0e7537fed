//! Query embedding
//!
//! The vector index is built out of process with 1024-dimension
//! `BAAI/bge-large-en-v1.5` embeddings; queries must be embedded with the
//! same model for similarity scores to mean anything.

pub mod engine;

use async_trait::async_trait;

use crate::errors::Result;

pub use engine::EmbeddingEngine;

/// Turns query text into a dense vector
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;

    /// Dimension of produced vectors
    fn dimension(&self) -> usize;
}
