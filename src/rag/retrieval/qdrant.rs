// Qdrant-backed vector retriever
use async_trait::async_trait;
use qdrant_client::{
    client::QdrantClient,
    qdrant::{
        point_id::PointIdOptions, value::Kind, with_payload_selector::SelectorOptions, PointId,
        SearchPoints, Value as QdrantValue, WithPayloadSelector,
    },
};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::VectorSettings;
use crate::embedding::Embedder;
use crate::errors::{PipelineError, Result};
use crate::rag::retrieval::VectorRetriever;
use crate::types::{ChunkMetadata, EvidenceChunk};

/// Payload keys that may carry the chunk text, in lookup order
const TEXT_KEYS: [&str; 2] = ["document", "text"];

/// Serialized node written by LlamaIndex-style ingestion
const NODE_CONTENT_KEY: &str = "_node_content";

/// Vector retriever over a Qdrant collection
pub struct QdrantRetriever {
    client: QdrantClient,
    collection: String,
    embedder: Arc<dyn Embedder>,
}

impl QdrantRetriever {
    /// Create a client for the configured collection
    pub fn connect(settings: &VectorSettings, embedder: Arc<dyn Embedder>) -> Result<Self> {
        Ok(Self {
            client: build_client(settings)?,
            collection: settings.collection.clone(),
            embedder,
        })
    }

    /// Check that the collection exists and return its point count
    pub async fn verify(&self) -> Result<u64> {
        collection_points(&self.client, &self.collection).await
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

/// Check a collection is reachable without loading an embedding model
pub async fn probe_collection(settings: &VectorSettings) -> Result<u64> {
    let client = build_client(settings)?;
    collection_points(&client, &settings.collection).await
}

fn build_client(settings: &VectorSettings) -> Result<QdrantClient> {
    QdrantClient::from_url(&settings.url)
        .with_api_key(settings.api_key.clone())
        .build()
        .map_err(|e| PipelineError::Retrieval(format!("Failed to create Qdrant client: {}", e)))
}

async fn collection_points(client: &QdrantClient, collection: &str) -> Result<u64> {
    let info = client.collection_info(collection).await.map_err(|e| {
        PipelineError::Retrieval(format!("Collection '{}' unavailable: {}", collection, e))
    })?;

    let points = info.result.and_then(|r| r.points_count).unwrap_or(0);
    info!(collection, points, "vector index reachable");
    Ok(points)
}

#[async_trait]
impl VectorRetriever for QdrantRetriever {
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<EvidenceChunk>> {
        let vector = self.embedder.embed_query(query).await?;

        let search_result = self
            .client
            .search_points(&SearchPoints {
                collection_name: self.collection.clone(),
                vector,
                limit: top_k as u64,
                with_payload: Some(WithPayloadSelector {
                    selector_options: Some(SelectorOptions::Enable(true)),
                }),
                ..Default::default()
            })
            .await
            .map_err(|e| PipelineError::Retrieval(format!("Failed to search points: {}", e)))?;

        let chunks: Vec<EvidenceChunk> = search_result
            .result
            .into_iter()
            .map(|point| {
                let payload = payload_to_json(point.payload);
                chunk_from_payload(point_id_to_string(&point.id), point.score, &payload)
            })
            .collect();

        debug!(top_k, returned = chunks.len(), "vector search complete");
        Ok(chunks)
    }
}

/// Build an evidence chunk from a JSON payload
pub fn chunk_from_payload(id: String, score: f32, payload: &Map<String, JsonValue>) -> EvidenceChunk {
    let text = TEXT_KEYS
        .iter()
        .find_map(|key| payload.get(*key).and_then(JsonValue::as_str))
        .map(str::to_string)
        .or_else(|| node_content_text(payload))
        .unwrap_or_default();

    let metadata = ChunkMetadata {
        file_name: payload
            .get("file_name")
            .and_then(JsonValue::as_str)
            .map(str::to_string),
        page_label: payload.get("page_label").and_then(json_to_label),
        page_number: payload.get("page_number").and_then(json_to_page_number),
    };

    EvidenceChunk::new(id, text, score, metadata)
}

fn node_content_text(payload: &Map<String, JsonValue>) -> Option<String> {
    let raw = payload.get(NODE_CONTENT_KEY)?.as_str()?;
    let node: JsonValue = serde_json::from_str(raw).ok()?;
    node.get("text")?.as_str().map(str::to_string)
}

fn json_to_label(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_to_page_number(value: &JsonValue) -> Option<u32> {
    match value {
        JsonValue::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn payload_to_json(payload: HashMap<String, QdrantValue>) -> Map<String, JsonValue> {
    payload
        .into_iter()
        .filter_map(|(key, value)| qdrant_to_json_value(&value).map(|json| (key, json)))
        .collect()
}

fn qdrant_to_json_value(value: &QdrantValue) -> Option<JsonValue> {
    value.kind.as_ref().and_then(|kind| match kind {
        Kind::StringValue(s) => Some(JsonValue::String(s.clone())),
        Kind::IntegerValue(i) => Some(JsonValue::Number((*i).into())),
        Kind::DoubleValue(f) => serde_json::Number::from_f64(*f).map(JsonValue::Number),
        Kind::BoolValue(b) => Some(JsonValue::Bool(*b)),
        _ => None,
    })
}

fn point_id_to_string(point_id: &Option<PointId>) -> String {
    point_id
        .as_ref()
        .and_then(|id| id.point_id_options.as_ref())
        .map(|options| match options {
            PointIdOptions::Num(n) => n.to_string(),
            PointIdOptions::Uuid(u) => u.clone(),
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: JsonValue) -> Map<String, JsonValue> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_chunk_from_flat_payload() {
        let chunk = chunk_from_payload(
            "42".to_string(),
            0.83,
            &payload(json!({
                "text": "Open circuit voltage (Voc): 450V",
                "file_name": "inverter_x_manual.pdf",
                "page_label": "12"
            })),
        );

        assert_eq!(chunk.id, "42");
        assert_eq!(chunk.text, "Open circuit voltage (Voc): 450V");
        assert_eq!(chunk.score, Some(0.83));
        assert_eq!(chunk.metadata.document_name(), "inverter_x_manual.pdf");
        assert_eq!(chunk.metadata.page(), Some("12".to_string()));
    }

    #[test]
    fn test_chunk_text_from_node_content() {
        let node = json!({"text": "Error 501: grounding fault"}).to_string();
        let chunk = chunk_from_payload(
            "n1".to_string(),
            0.5,
            &payload(json!({"_node_content": node, "page_number": 3})),
        );

        assert_eq!(chunk.text, "Error 501: grounding fault");
        assert_eq!(chunk.metadata.page(), Some("3".to_string()));
        assert_eq!(chunk.metadata.document_name(), "Unknown Document");
    }

    #[test]
    fn test_numeric_page_label_is_stringified() {
        let chunk = chunk_from_payload("x".to_string(), 0.1, &payload(json!({"page_label": 7})));
        assert_eq!(chunk.metadata.page_label.as_deref(), Some("7"));
    }

    #[test]
    fn test_qdrant_value_conversion() {
        let value = QdrantValue::from("manual.pdf".to_string());
        assert_eq!(qdrant_to_json_value(&value), Some(json!("manual.pdf")));

        let value = QdrantValue::from(12i64);
        assert_eq!(qdrant_to_json_value(&value), Some(json!(12)));
    }

    #[test]
    fn test_point_id_to_string() {
        assert_eq!(point_id_to_string(&Some(PointId::from(7u64))), "7");
        assert_eq!(point_id_to_string(&None), "unknown");
    }
}
