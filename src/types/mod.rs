//! Type definitions module
//!
//! Core values flowing through the pipeline: the incoming query and its
//! intent, retrieved evidence, and the response envelope returned to callers.

pub mod query;
pub mod evidence;
pub mod envelope;

// Re-export commonly used types
pub use query::{Intent, Query};
pub use evidence::{ChunkMetadata, EvidenceChunk, Provenance};
pub use envelope::{Citation, ResponseEnvelope, Source};
