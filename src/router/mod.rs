//! Semantic router
//!
//! One classification completion per query. The reply is matched by
//! case-insensitive substring in priority order TECHNICAL > MARKET > ACTION,
//! so a verbose reply naming several categories resolves to the first in
//! that order. Any model failure or unrecognized reply routes to TECHNICAL.

use tracing::{debug, warn};

use crate::llm::{prompts, LanguageModel};
use crate::types::Intent;

/// Classify a query; never fails
pub async fn semantic_router(llm: &dyn LanguageModel, query: &str) -> Intent {
    match llm.complete(&prompts::classification_prompt(query)).await {
        Ok(reply) => match parse_intent(&reply) {
            Some(intent) => intent,
            None => {
                debug!(reply = %reply.trim(), "unrecognized category, defaulting to TECHNICAL");
                Intent::Technical
            }
        },
        Err(e) => {
            warn!(error = %e, "classification failed, defaulting to TECHNICAL");
            Intent::Technical
        }
    }
}

/// First category label contained in the reply, by priority
pub fn parse_intent(reply: &str) -> Option<Intent> {
    let normalized = reply.trim().to_uppercase();

    Intent::PRIORITY
        .into_iter()
        .find(|intent| normalized.contains(intent.label()))
}
