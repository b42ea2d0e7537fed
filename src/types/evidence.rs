//! Retrieved evidence chunks and their source metadata

use serde::{Deserialize, Serialize};

/// Document name used when the index carries no file name
pub const UNKNOWN_DOCUMENT: &str = "Unknown Document";

/// Where an evidence chunk came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Raw candidate from the vector index
    VectorIndex,
    /// Survivor of the reranking pass, re-scored
    Reranked,
}

/// Source metadata attached to a chunk at indexing time
///
/// Every field is optional: chunks indexed from plain text files carry no page
/// information, and some carry no file name at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub file_name: Option<String>,
    pub page_label: Option<String>,
    pub page_number: Option<u32>,
}

impl ChunkMetadata {
    /// Metadata for a named document without page information
    pub fn document(file_name: impl Into<String>) -> Self {
        Self {
            file_name: Some(file_name.into()),
            ..Default::default()
        }
    }

    /// Set the page label
    pub fn with_page(mut self, page_label: impl Into<String>) -> Self {
        self.page_label = Some(page_label.into());
        self
    }

    /// Document name, falling back to [`UNKNOWN_DOCUMENT`]
    pub fn document_name(&self) -> &str {
        self.file_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_DOCUMENT)
    }

    /// Page label if present, otherwise the numeric page
    pub fn page(&self) -> Option<String> {
        self.page_label
            .as_deref()
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .or_else(|| self.page_number.map(|n| n.to_string()))
    }
}

/// Unit of retrieved manual text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceChunk {
    pub id: String,
    pub text: String,
    /// Similarity or rerank score; absent when the source gave none
    pub score: Option<f32>,
    pub metadata: ChunkMetadata,
    pub provenance: Provenance,
}

impl EvidenceChunk {
    /// Create a candidate straight from the vector index
    pub fn new(id: impl Into<String>, text: impl Into<String>, score: f32, metadata: ChunkMetadata) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            score: Some(score),
            metadata,
            provenance: Provenance::VectorIndex,
        }
    }

    /// Mark this chunk as a reranked survivor with a new score
    pub fn reranked(mut self, score: f32) -> Self {
        self.score = Some(score);
        self.provenance = Provenance::Reranked;
        self
    }
}
