// Cohere rerank API client
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::RerankSettings;
use crate::errors::{PipelineError, Result};
use crate::rag::reranking::Reranker;
use crate::types::EvidenceChunk;

/// Request timeout (30 seconds)
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Hosted cross-encoder reranker
#[derive(Debug, Clone)]
pub struct CohereReranker {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl CohereReranker {
    /// Create client from settings; fails when no API key is configured
    pub fn from_settings(settings: &RerankSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or_else(|| PipelineError::Config("COHERE_API_KEY is not set".to_string()))?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(PipelineError::Http)?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Reranker for CohereReranker {
    async fn rerank(
        &self,
        query: &str,
        candidates: Vec<EvidenceChunk>,
        top_n: usize,
    ) -> Result<Vec<EvidenceChunk>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/v1/rerank", self.base_url);
        let documents: Vec<&str> = candidates.iter().map(|c| c.text.as_str()).collect();

        let request = RerankRequest {
            model: &self.model,
            query,
            documents,
            top_n,
            return_documents: false,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::Rerank(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PipelineError::Rerank(format!("HTTP {}: {}", status, error_text)));
        }

        let body: RerankResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Rerank(format!("Failed to parse response: {}", e)))?;

        let ranked = apply_results(candidates, body.results, top_n)?;
        debug!(model = %self.model, kept = ranked.len(), "rerank complete");
        Ok(ranked)
    }
}

/// Map scored indices back onto the candidates, in the order returned
fn apply_results(
    candidates: Vec<EvidenceChunk>,
    results: Vec<RerankResult>,
    top_n: usize,
) -> Result<Vec<EvidenceChunk>> {
    let mut slots: Vec<Option<EvidenceChunk>> = candidates.into_iter().map(Some).collect();
    let mut ranked = Vec::with_capacity(top_n.min(slots.len()));

    for result in results.into_iter().take(top_n) {
        let chunk = slots
            .get_mut(result.index)
            .and_then(Option::take)
            .ok_or_else(|| {
                PipelineError::Rerank(format!("Result index {} out of range or repeated", result.index))
            })?;
        ranked.push(chunk.reranked(result.relevance_score));
    }

    Ok(ranked)
}

#[derive(Debug, Serialize)]
struct RerankRequest<'a> {
    model: &'a str,
    query: &'a str,
    documents: Vec<&'a str>,
    top_n: usize,
    return_documents: bool,
}

#[derive(Debug, Deserialize)]
struct RerankResponse {
    results: Vec<RerankResult>,
}

#[derive(Debug, Deserialize)]
struct RerankResult {
    index: usize,
    relevance_score: f32,
}
