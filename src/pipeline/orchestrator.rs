//! Query pipeline orchestrator
//!
//! Classifies each query, runs exactly one branch, and turns the branch's
//! tagged outcome into a [`ResponseEnvelope`]. Expected failures of external
//! services never escape: every branch returns a `Result` that is matched
//! here and mapped to an error envelope.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::config::Settings;
use crate::errors::{PipelineError, Result};
use crate::llm::{prompts, GroqClient, LanguageModel};
use crate::pipeline::state::{PipelineEvent, PipelineState, StateTrace};
use crate::rag::{build_query_engine, extract_citations, transform_query, EngineResponse, QueryEngine};
use crate::router::semantic_router;
use crate::types::{Intent, Query, ResponseEnvelope};
use crate::websearch::{web_search_from_settings, SearchDepth, WebResult, WebSearch};

/// Shown when retrieval, reranking or synthesis fails
pub const TECHNICAL_BUSY_MESSAGE: &str =
    "Maaf, sistem database sedang sibuk. Silakan coba sesaat lagi.";

/// Prefix of the market-path failure message; the error text follows
pub const MARKET_UNAVAILABLE_PREFIX: &str = "Gagal akses data pasar";

/// Device control is not wired to a live control channel yet
pub const ACTION_PLACEHOLDER: &str =
    "⚠️ [MOCK] Kontrol perangkat belum terhubung ke MQTT Broker. Perintah tidak dikirim.";

/// Web results used for market answers and citations
pub const DEFAULT_MARKET_RESULTS: usize = 3;

/// Successful result of one branch
#[derive(Debug, Clone)]
pub enum BranchOutcome {
    /// Technical path answered from the manual index
    Rag {
        refined_query: String,
        answer: EngineResponse,
    },
    /// Market path answered from web results
    Web {
        answer: String,
        results: Vec<WebResult>,
    },
    /// Device-action stub
    Action,
}

/// Everything recorded while processing one query
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub intent: Intent,
    /// Retriever input on the technical path; never part of the envelope
    pub refined_query: Option<String>,
    pub trace: StateTrace,
    pub envelope: ResponseEnvelope,
}

/// Top-level query pipeline
///
/// Holds only shared read-only client handles, so one instance can serve
/// many queries concurrently.
pub struct Pipeline {
    llm: Arc<dyn LanguageModel>,
    engine: Arc<QueryEngine>,
    web: Arc<dyn WebSearch>,
    market_results: usize,
}

impl Pipeline {
    /// Create pipeline from its collaborators
    pub fn new(llm: Arc<dyn LanguageModel>, engine: Arc<QueryEngine>, web: Arc<dyn WebSearch>) -> Self {
        Self {
            llm,
            engine,
            web,
            market_results: DEFAULT_MARKET_RESULTS,
        }
    }

    /// Build the production pipeline from settings
    ///
    /// Fails when the language model is not configured or the query engine
    /// cannot be built after retries. A missing web search key only disables
    /// the market path.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let llm: Arc<dyn LanguageModel> = Arc::new(GroqClient::from_settings(&settings.llm)?);
        let web = web_search_from_settings(&settings.web)?;
        let engine = build_query_engine(settings, llm.clone()).await?;

        Ok(Self::new(llm, Arc::new(engine), web).with_market_results(settings.web.max_results))
    }

    /// Override how many web results feed market answers
    pub fn with_market_results(mut self, market_results: usize) -> Self {
        self.market_results = market_results;
        self
    }

    /// Answer raw query text
    pub async fn process(&self, text: &str) -> ResponseEnvelope {
        self.run(&Query::new(text)).await.envelope
    }

    /// Answer a query
    pub async fn process_query(&self, query: &Query) -> ResponseEnvelope {
        self.run(query).await.envelope
    }

    /// Process a query and keep the routing details
    #[instrument(
        name = "query",
        skip(self, query),
        fields(query_id = %query.id(), user = query.user_id().unwrap_or("-"))
    )]
    pub async fn run(&self, query: &Query) -> PipelineRun {
        let started = Instant::now();
        let mut trace = StateTrace::new();

        let intent = semantic_router(self.llm.as_ref(), query.text()).await;
        advance(&mut trace, PipelineEvent::Classified);
        info!(route = %intent, "query routed");

        advance(&mut trace, PipelineEvent::Dispatch(intent));
        let outcome = match intent {
            Intent::Technical => self.technical(query).await,
            Intent::Market => self.market(query).await,
            Intent::Action => Ok(BranchOutcome::Action),
        };
        advance(&mut trace, PipelineEvent::BranchFinished);

        let refined_query = match &outcome {
            Ok(BranchOutcome::Rag { refined_query, .. }) => Some(refined_query.clone()),
            _ => None,
        };
        let envelope = envelope_for(intent, outcome);

        info!(
            source = %envelope.source,
            citations = envelope.citations.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "query responded"
        );

        PipelineRun {
            intent,
            refined_query,
            trace,
            envelope,
        }
    }

    /// Technical path: rewrite, then retrieve -> rerank -> synthesize
    async fn technical(&self, query: &Query) -> Result<BranchOutcome> {
        let refined_query = transform_query(self.llm.as_ref(), query.text()).await?;
        info!(refined = %refined_query, "query refined");

        let answer = self.engine.query(&refined_query).await?;
        Ok(BranchOutcome::Rag {
            refined_query,
            answer,
        })
    }

    /// Market path: web search on the raw query, answer from top results
    async fn market(&self, query: &Query) -> Result<BranchOutcome> {
        let mut results = self.web.search(query.text(), SearchDepth::Basic).await?;
        results.truncate(self.market_results);

        let context = results
            .iter()
            .map(|r| format!("- {}", r.content))
            .collect::<Vec<_>>()
            .join("\n");

        let answer = self
            .llm
            .complete(&prompts::market_prompt(query.text(), &context))
            .await?;

        Ok(BranchOutcome::Web { answer, results })
    }
}

/// Map a branch outcome to the envelope returned to the caller
pub fn envelope_for(intent: Intent, outcome: Result<BranchOutcome>) -> ResponseEnvelope {
    match outcome {
        Ok(BranchOutcome::Rag { answer, .. }) => {
            let citations = extract_citations(&answer.source_nodes);
            ResponseEnvelope::rag(answer.response, citations)
        }
        Ok(BranchOutcome::Web { answer, results }) => {
            let citations = results.iter().map(WebResult::citation).collect();
            ResponseEnvelope::web(answer, citations)
        }
        Ok(BranchOutcome::Action) => ResponseEnvelope::action(ACTION_PLACEHOLDER),
        Err(e) => failure_envelope(intent, &e),
    }
}

fn failure_envelope(intent: Intent, error: &PipelineError) -> ResponseEnvelope {
    match intent {
        Intent::Market => {
            warn!(error = %error, "market branch failed");
            ResponseEnvelope::error(format!("{}: {}", MARKET_UNAVAILABLE_PREFIX, error))
        }
        _ => {
            error!(error = %error, "technical branch failed");
            ResponseEnvelope::error(TECHNICAL_BUSY_MESSAGE)
        }
    }
}

fn advance(trace: &mut StateTrace, event: PipelineEvent) -> PipelineState {
    match trace.advance(event) {
        Ok(state) => {
            debug!(?state, executing = state.is_executing(), "state advanced");
            state
        }
        Err(e) => {
            error!(error = %e, "orchestrator state machine violated");
            trace.current()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChunkMetadata, EvidenceChunk, Source};

    fn rag_outcome(sources: Vec<EvidenceChunk>) -> BranchOutcome {
        BranchOutcome::Rag {
            refined_query: "open circuit voltage".to_string(),
            answer: EngineResponse {
                response: "450V".to_string(),
                source_nodes: sources,
                candidates_retrieved: 15,
            },
        }
    }

    #[test]
    fn test_rag_envelope_dedups_citations() {
        let meta = ChunkMetadata::document("inverter_x.pdf").with_page("3");
        let sources = vec![
            EvidenceChunk::new("1", "a", 0.9, meta.clone()).reranked(0.9),
            EvidenceChunk::new("2", "b", 0.5, meta).reranked(0.5),
        ];

        let envelope = envelope_for(Intent::Technical, Ok(rag_outcome(sources)));

        assert_eq!(envelope.source, Source::Rag);
        assert_eq!(envelope.response, "450V");
        assert_eq!(envelope.citations.len(), 1);
    }

    #[test]
    fn test_technical_failure_hides_error_detail() {
        let envelope = envelope_for(
            Intent::Technical,
            Err(PipelineError::Retrieval("collection missing".to_string())),
        );
        assert_eq!(envelope, ResponseEnvelope::error(TECHNICAL_BUSY_MESSAGE));
    }

    #[test]
    fn test_market_failure_includes_error_text() {
        let envelope = envelope_for(
            Intent::Market,
            Err(PipelineError::WebSearch("HTTP 432".to_string())),
        );
        assert!(envelope.is_error());
        assert!(envelope.response.starts_with(MARKET_UNAVAILABLE_PREFIX));
        assert!(envelope.response.contains("HTTP 432"));
        assert!(envelope.citations.is_empty());
    }

    #[test]
    fn test_web_envelope_cites_every_result() {
        let results = vec![
            WebResult {
                title: Some("A".to_string()),
                url: "https://a.example".to_string(),
                content: "x".to_string(),
            },
            WebResult {
                title: None,
                url: "https://b.example".to_string(),
                content: "y".to_string(),
            },
        ];
        let envelope = envelope_for(
            Intent::Market,
            Ok(BranchOutcome::Web {
                answer: "Rp 2 juta".to_string(),
                results,
            }),
        );

        assert_eq!(envelope.source, Source::Web);
        assert_eq!(envelope.citations.len(), 2);
        assert!(envelope.citations.iter().all(|c| c.url().is_some()));
    }

    #[test]
    fn test_action_envelope() {
        let envelope = envelope_for(Intent::Action, Ok(BranchOutcome::Action));
        assert_eq!(envelope, ResponseEnvelope::action(ACTION_PLACEHOLDER));
    }
}
