//! Error types for the Hieren query pipeline
//!
//! One variant per failing collaborator so that branch boundaries can log
//! what went wrong while still returning a uniform envelope to the caller.

use thiserror::Error;

/// Main error type for the query pipeline and its service adapters
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Orchestrator state machine errors
    #[error("Invalid state transition from {from} via {event}: {reason}")]
    InvalidTransition {
        from: String,
        event: String,
        reason: String,
    },

    /// Language model completion errors (routing, rewriting, synthesis)
    #[error("Language model error: {0}")]
    LanguageModel(String),

    /// Vector index search errors
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Reranker errors
    #[error("Rerank error: {0}")]
    Rerank(String),

    /// Web search errors
    #[error("Web search error: {0}")]
    WebSearch(String),

    /// Query embedding errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (missing credentials, bad values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Timeout errors
    #[error("Operation timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Generic errors with context
    #[error("Pipeline error: {0}")]
    Generic(String),
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Convert anyhow errors to PipelineError
impl From<anyhow::Error> for PipelineError {
    fn from(err: anyhow::Error) -> Self {
        PipelineError::Generic(format!("{:#}", err))
    }
}
