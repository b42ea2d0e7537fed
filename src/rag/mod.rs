// Retrieval-augmented generation for the technical path
//
// Components:
// - Retrieval: similarity search over the manual index
// - Re-ranking: hosted cross-encoder or local keyword scorer
// - Transform: rewrite colloquial questions before retrieval
// - Engine: retrieve -> rerank -> synthesize, built once with retries
// - Citations: dedup evidence into user-facing references

pub mod retrieval;
pub mod reranking;
pub mod transform;
pub mod engine;
pub mod citations;

// Re-export key types
pub use retrieval::VectorRetriever;
pub use reranking::Reranker;
pub use transform::transform_query;
pub use engine::{build_query_engine, EngineResponse, QueryEngine};
pub use citations::extract_citations;
