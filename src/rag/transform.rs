// Query transformation: colloquial question -> manual-search query
use tracing::debug;

use crate::errors::Result;
use crate::llm::{prompts, LanguageModel};

/// Characters removed from the model's rewrite
const QUOTE_CHARS: [char; 3] = ['"', '\u{201C}', '\u{201D}'];

/// Rewrite a user question into precise technical terminology
///
/// The rewrite is only used as retriever input. An empty rewrite falls back
/// to the raw text so the index is never queried with nothing.
pub async fn transform_query(llm: &dyn LanguageModel, query: &str) -> Result<String> {
    let completion = llm.complete(&prompts::rewrite_prompt(query)).await?;
    let refined = clean_rewrite(&completion);

    if refined.is_empty() {
        debug!("empty rewrite, using raw query");
        return Ok(query.trim().to_string());
    }

    Ok(refined)
}

/// Strip quotation marks and surrounding whitespace
pub fn clean_rewrite(text: &str) -> String {
    text.replace(&QUOTE_CHARS[..], "").trim().to_string()
}
