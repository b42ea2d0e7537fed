// Technical-path query engine: retrieve -> rerank -> synthesize
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{RerankSettings, Settings};
use crate::embedding::{Embedder, EmbeddingEngine};
use crate::errors::{PipelineError, Result};
use crate::llm::{prompts, LanguageModel};
use crate::rag::reranking::{CohereReranker, KeywordReranker, Reranker};
use crate::rag::retrieval::{QdrantRetriever, VectorRetriever};
use crate::resilience::RetryPolicy;
use crate::types::EvidenceChunk;

/// Candidates requested from the vector index
pub const DEFAULT_SIMILARITY_TOP_K: usize = 15;

/// Chunks kept after reranking
pub const DEFAULT_RERANK_TOP_N: usize = 5;

/// Answer returned when reranking leaves no evidence
pub const EMPTY_RESPONSE: &str = "Empty Response";

/// Synthesized answer bundled with the evidence it drew from
#[derive(Debug, Clone)]
pub struct EngineResponse {
    pub response: String,
    /// Reranked evidence, most relevant first
    pub source_nodes: Vec<EvidenceChunk>,
    pub candidates_retrieved: usize,
}

/// Retrieval-augmented answer engine
pub struct QueryEngine {
    retriever: Arc<dyn VectorRetriever>,
    reranker: Arc<dyn Reranker>,
    llm: Arc<dyn LanguageModel>,
    similarity_top_k: usize,
    rerank_top_n: usize,
}

impl QueryEngine {
    /// Create engine with default limits (15 candidates, 5 kept)
    pub fn new(
        retriever: Arc<dyn VectorRetriever>,
        reranker: Arc<dyn Reranker>,
        llm: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            retriever,
            reranker,
            llm,
            similarity_top_k: DEFAULT_SIMILARITY_TOP_K,
            rerank_top_n: DEFAULT_RERANK_TOP_N,
        }
    }

    /// Override candidate and kept counts
    pub fn with_limits(mut self, similarity_top_k: usize, rerank_top_n: usize) -> Self {
        self.similarity_top_k = similarity_top_k;
        self.rerank_top_n = rerank_top_n;
        self
    }

    /// Answer a (refined) query from the manual index
    pub async fn query(&self, query: &str) -> Result<EngineResponse> {
        let candidates = self.retriever.search(query, self.similarity_top_k).await?;
        let candidates_retrieved = candidates.len();

        let source_nodes = self
            .reranker
            .rerank(query, candidates, self.rerank_top_n)
            .await?;
        debug!(
            retrieved = candidates_retrieved,
            reranked = source_nodes.len(),
            "evidence selected"
        );

        if source_nodes.is_empty() {
            return Ok(EngineResponse {
                response: EMPTY_RESPONSE.to_string(),
                source_nodes,
                candidates_retrieved,
            });
        }

        let prompt = prompts::synthesis_prompt(query, &source_nodes);
        let response = self.llm.complete(&prompt).await?.trim().to_string();

        Ok(EngineResponse {
            response,
            source_nodes,
            candidates_retrieved,
        })
    }

    pub fn similarity_top_k(&self) -> usize {
        self.similarity_top_k
    }

    pub fn rerank_top_n(&self) -> usize {
        self.rerank_top_n
    }
}

/// Build the production engine, retrying construction with backoff
///
/// Exhausted retries are fatal: technical queries cannot be served without
/// the index, so the caller should abort startup.
pub async fn build_query_engine(settings: &Settings, llm: Arc<dyn LanguageModel>) -> Result<QueryEngine> {
    let policy = RetryPolicy::from_settings(&settings.resilience);
    debug!(
        max_wait_ms = policy.max_total_wait_time().as_millis() as u64,
        "building query engine"
    );

    let engine = policy
        .execute_with_retry(|| connect_engine(settings, llm.clone()))
        .await?;

    info!(
        top_k = engine.similarity_top_k(),
        top_n = engine.rerank_top_n(),
        "query engine ready"
    );
    Ok(engine)
}

async fn connect_engine(settings: &Settings, llm: Arc<dyn LanguageModel>) -> Result<QueryEngine> {
    let embedding_settings = settings.embedding.clone();
    let embedder = tokio::task::spawn_blocking(move || EmbeddingEngine::load(&embedding_settings))
        .await
        .map_err(|e| PipelineError::Embedding(format!("Model loading task failed: {}", e)))?
        .map_err(|e| PipelineError::Embedding(format!("{:#}", e)))?;

    if embedder.dimension() != settings.embedding.dimension {
        return Err(PipelineError::Config(format!(
            "Embedding dimension mismatch: model {} vs configured {}",
            embedder.dimension(),
            settings.embedding.dimension
        )));
    }

    let retriever = QdrantRetriever::connect(&settings.vector, Arc::new(embedder))?;
    let points = retriever.verify().await?;
    debug!(collection = retriever.collection(), points, "retriever connected");

    let reranker = select_reranker(&settings.rerank)?;

    Ok(QueryEngine::new(Arc::new(retriever), reranker, llm)
        .with_limits(settings.vector.similarity_top_k, settings.rerank.top_n))
}

/// Hosted reranker when a key is configured, local keyword scorer otherwise
pub fn select_reranker(settings: &RerankSettings) -> Result<Arc<dyn Reranker>> {
    if settings.api_key.is_some() {
        Ok(Arc::new(CohereReranker::from_settings(settings)?))
    } else {
        warn!("COHERE_API_KEY not set, using local keyword reranker");
        Ok(Arc::new(KeywordReranker::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChunkMetadata, Provenance};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StaticRetriever {
        chunks: Vec<EvidenceChunk>,
        requested: Mutex<Vec<(String, usize)>>,
    }

    #[async_trait]
    impl VectorRetriever for StaticRetriever {
        async fn search(&self, query: &str, top_k: usize) -> Result<Vec<EvidenceChunk>> {
            self.requested.lock().unwrap().push((query.to_string(), top_k));
            Ok(self.chunks.iter().take(top_k).cloned().collect())
        }
    }

    struct EchoLlm {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LanguageModel for EchoLlm {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("  Voc maksimum adalah 450V.  ".to_string())
        }
    }

    fn chunks(n: usize) -> Vec<EvidenceChunk> {
        (0..n)
            .map(|i| {
                EvidenceChunk::new(
                    i.to_string(),
                    format!("page {} text", i),
                    1.0 - i as f32 * 0.01,
                    ChunkMetadata::document("inverter_x.pdf").with_page(i.to_string()),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_query_requests_candidates_and_keeps_top_n() {
        let retriever = Arc::new(StaticRetriever {
            chunks: chunks(20),
            requested: Mutex::new(Vec::new()),
        });
        let llm = Arc::new(EchoLlm { prompts: Mutex::new(Vec::new()) });
        let engine = QueryEngine::new(retriever.clone(), Arc::new(KeywordReranker::new()), llm.clone());

        let answer = engine.query("open circuit voltage").await.unwrap();

        assert_eq!(
            retriever.requested.lock().unwrap().as_slice(),
            &[("open circuit voltage".to_string(), 15)]
        );
        assert_eq!(answer.candidates_retrieved, 15);
        assert_eq!(answer.source_nodes.len(), 5);
        assert!(answer.source_nodes.iter().all(|c| c.provenance == Provenance::Reranked));
        assert_eq!(answer.response, "Voc maksimum adalah 450V.");
        assert_eq!(llm.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_evidence_skips_synthesis() {
        let retriever = Arc::new(StaticRetriever {
            chunks: Vec::new(),
            requested: Mutex::new(Vec::new()),
        });
        let llm = Arc::new(EchoLlm { prompts: Mutex::new(Vec::new()) });
        let engine = QueryEngine::new(retriever, Arc::new(KeywordReranker::new()), llm.clone());

        let answer = engine.query("anything").await.unwrap();

        assert_eq!(answer.response, EMPTY_RESPONSE);
        assert!(answer.source_nodes.is_empty());
        assert!(llm.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_select_reranker_without_key_is_local() {
        assert!(select_reranker(&RerankSettings::default()).is_ok());
    }
}
