//! Citation extraction from technical-path evidence
//!
//! Evidence is walked in ranked order and deduplicated on
//! `(document, page)`: the first chunk for a key wins, so the citation list
//! keeps the reranker's relevance ordering and is never longer than the
//! evidence list.

use std::collections::HashSet;

use crate::types::{Citation, EvidenceChunk};

/// Turn ranked evidence into deduplicated document citations
pub fn extract_citations(evidence: &[EvidenceChunk]) -> Vec<Citation> {
    let mut seen: HashSet<(String, Option<String>)> = HashSet::new();
    let mut citations = Vec::new();

    for chunk in evidence {
        let document = chunk.metadata.document_name().to_string();
        let page = chunk.metadata.page();

        if !seen.insert((document.clone(), page.clone())) {
            continue;
        }

        citations.push(Citation::Document {
            document,
            relevance: chunk.score.map(round_relevance),
            page,
        });
    }

    citations
}

/// Round a score to three decimal places
fn round_relevance(score: f32) -> f64 {
    (f64::from(score) * 1000.0).round() / 1000.0
}
