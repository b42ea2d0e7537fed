//! Language model seam
//!
//! One completion call serves classification, query rewriting and answer
//! synthesis; only the prompt differs per call site (see [`prompts`]).

pub mod groq;
pub mod prompts;

use async_trait::async_trait;

use crate::errors::Result;

pub use groq::GroqClient;

/// Text completion backend
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete a prompt and return the generated text
    async fn complete(&self, prompt: &str) -> Result<String>;
}
