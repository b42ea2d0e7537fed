//! Hieren - routed question answering over renewable-energy equipment manuals
//!
//! Every query is classified into one of three routes and answered by
//! exactly one branch:
//!
//! - **Technical**: rewrite, retrieve from the manual index, rerank, synthesize
//! - **Market**: live web search, answer from the top results
//! - **Action**: device-control placeholder
//!
//! The caller always receives a [`types::ResponseEnvelope`]; failures of
//! external services are mapped to error envelopes instead of propagating.

pub mod errors;
pub mod types;
pub mod config;
pub mod resilience;

// Service adapters
pub mod llm;
pub mod embedding;
pub mod rag;
pub mod websearch;

// Routing and orchestration
pub mod router;
pub mod pipeline;

// Command-line surface
pub mod cli;
pub mod doctor;
pub mod eval;
pub mod telemetry;

// Re-export commonly used types
pub use errors::{PipelineError, Result};
pub use pipeline::Pipeline;
pub use types::{Citation, Intent, Query, ResponseEnvelope, Source};
