//! Prompt templates for each language model call site

use crate::types::EvidenceChunk;

/// Intent classification; the reply is expected to be a single category word
pub fn classification_prompt(query: &str) -> String {
    format!(
        r#"
Classify the following query into exactly one category:
1. TECHNICAL: Manuals, troubleshooting, installation, calculations (e.g. "How to wire", "Error 501").
2. MARKET: Real-time prices, news, government regulations, weather.
3. ACTION: Direct commands to control devices (e.g. "Turn off", "Set limit").
Query: "{query}"
Category (Just one word):"#
    )
}

/// Rewrite of a colloquial question into manual-search terminology
pub fn rewrite_prompt(query: &str) -> String {
    format!(
        r#"
Kamu adalah ahli energi terbarukan. Tulis ulang pertanyaan user menjadi query pencarian
yang spesifik dan teknis untuk database manual alat.
Gunakan istilah baku (misal: "listrik naik turun" -> "voltage fluctuation").
User: "{query}"
Technical Query:"#
    )
}

/// Answer synthesis over reranked manual excerpts
pub fn synthesis_prompt(query: &str, evidence: &[EvidenceChunk]) -> String {
    let context = evidence_blocks(evidence);
    format!(
        r#"Context information is below.
---------------------
{context}
---------------------
Given the context information and not prior knowledge, answer the query.
Query: {query}
Answer: "#
    )
}

/// Answer grounded in web search snippets
pub fn market_prompt(query: &str, context: &str) -> String {
    format!("Jawab berdasarkan data web ini:\n{context}\n\nPertanyaan: {query}")
}

/// Render evidence as metadata header plus text, blank line between chunks
fn evidence_blocks(evidence: &[EvidenceChunk]) -> String {
    evidence
        .iter()
        .map(|chunk| {
            let mut header = format!("file_name: {}", chunk.metadata.document_name());
            if let Some(page) = chunk.metadata.page() {
                header.push_str(&format!("\npage_label: {}", page));
            }
            format!("{}\n\n{}", header, chunk.text.trim())
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
