//! Scripted, call-counting fakes of the pipeline collaborators

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use hieren::errors::{PipelineError, Result};
use hieren::llm::LanguageModel;
use hieren::pipeline::Pipeline;
use hieren::rag::{QueryEngine, Reranker, VectorRetriever};
use hieren::types::{ChunkMetadata, EvidenceChunk};
use hieren::websearch::{SearchDepth, WebResult, WebSearch};

/// Which call site a prompt came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Classify,
    Rewrite,
    Synthesize,
    Market,
}

impl PromptKind {
    fn of(prompt: &str) -> Self {
        if prompt.contains("Category (Just one word)") {
            PromptKind::Classify
        } else if prompt.contains("Technical Query:") {
            PromptKind::Rewrite
        } else if prompt.starts_with("Context information is below") {
            PromptKind::Synthesize
        } else {
            PromptKind::Market
        }
    }
}

/// Language model answering each call site from a fixed script
pub struct ScriptedLlm {
    pub classify: Result<String>,
    pub rewrite: Result<String>,
    pub synthesize: Result<String>,
    pub market: Result<String>,
    calls: Mutex<Vec<(PromptKind, String)>>,
}

impl ScriptedLlm {
    pub fn new(category: &str) -> Self {
        Self {
            classify: Ok(category.to_string()),
            rewrite: Ok("inverter x open circuit voltage".to_string()),
            synthesize: Ok("Voc maksimum Inverter X adalah 450V.".to_string()),
            market: Ok("Harga panel surya 500Wp sekitar Rp 2 juta.".to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self, kind: PromptKind) -> usize {
        self.calls.lock().unwrap().iter().filter(|(k, _)| *k == kind).count()
    }

    pub fn prompts(&self, kind: PromptKind) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

fn replay(scripted: &Result<String>) -> Result<String> {
    match scripted {
        Ok(text) => Ok(text.clone()),
        Err(e) => Err(PipelineError::LanguageModel(e.to_string())),
    }
}

#[async_trait]
impl LanguageModel for ScriptedLlm {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let kind = PromptKind::of(prompt);
        self.calls.lock().unwrap().push((kind, prompt.to_string()));

        match kind {
            PromptKind::Classify => replay(&self.classify),
            PromptKind::Rewrite => replay(&self.rewrite),
            PromptKind::Synthesize => replay(&self.synthesize),
            PromptKind::Market => replay(&self.market),
        }
    }
}

/// Vector retriever returning a fixed candidate list
pub struct FakeRetriever {
    chunks: Vec<EvidenceChunk>,
    fail: bool,
    queries: Mutex<Vec<(String, usize)>>,
}

impl FakeRetriever {
    pub fn with_chunks(chunks: Vec<EvidenceChunk>) -> Self {
        Self {
            chunks,
            fail: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            chunks: Vec::new(),
            fail: true,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorRetriever for FakeRetriever {
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<EvidenceChunk>> {
        self.queries.lock().unwrap().push((query.to_string(), top_k));
        if self.fail {
            return Err(PipelineError::Retrieval("index unavailable".to_string()));
        }
        Ok(self.chunks.iter().take(top_k).cloned().collect())
    }
}

/// Reranker keeping the incoming order, or failing every call
pub struct PassthroughReranker {
    calls: AtomicUsize,
    fail: bool,
}

impl PassthroughReranker {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Reranker for PassthroughReranker {
    async fn rerank(
        &self,
        _query: &str,
        candidates: Vec<EvidenceChunk>,
        top_n: usize,
    ) -> Result<Vec<EvidenceChunk>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PipelineError::Rerank("HTTP 500: internal error".to_string()));
        }
        Ok(candidates
            .into_iter()
            .take(top_n)
            .map(|c| {
                let score = c.score.unwrap_or(0.0);
                c.reranked(score)
            })
            .collect())
    }
}

/// Web search returning fixed results or failing
pub struct FakeWebSearch {
    results: Vec<WebResult>,
    fail: Option<String>,
    queries: Mutex<Vec<(String, SearchDepth)>>,
}

impl FakeWebSearch {
    pub fn with_results(results: Vec<WebResult>) -> Self {
        Self {
            results,
            fail: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            results: Vec::new(),
            fail: Some(message.to_string()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<(String, SearchDepth)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearch for FakeWebSearch {
    async fn search(&self, query: &str, depth: SearchDepth) -> Result<Vec<WebResult>> {
        self.queries.lock().unwrap().push((query.to_string(), depth));
        match &self.fail {
            Some(message) => Err(PipelineError::WebSearch(message.clone())),
            None => Ok(self.results.clone()),
        }
    }
}

/// Manual chunk with document, page and similarity score
pub fn chunk(id: &str, document: &str, page: &str, score: f32) -> EvidenceChunk {
    EvidenceChunk::new(
        id,
        format!("{} page {} excerpt", document, page),
        score,
        ChunkMetadata::document(document).with_page(page),
    )
}

/// Numbered web results
pub fn web_results(n: usize) -> Vec<WebResult> {
    (1..=n)
        .map(|i| WebResult {
            title: Some(format!("Harga Panel {}", i)),
            url: format!("https://toko{}.example/panel-500wp", i),
            content: format!("Panel 500Wp Rp {} juta", i + 1),
        })
        .collect()
}

/// All fakes wired into one pipeline, kept for assertions
pub struct Harness {
    pub llm: Arc<ScriptedLlm>,
    pub retriever: Arc<FakeRetriever>,
    pub reranker: Arc<PassthroughReranker>,
    pub web: Arc<FakeWebSearch>,
    pub pipeline: Pipeline,
}

impl Harness {
    pub fn new(llm: ScriptedLlm, retriever: FakeRetriever, web: FakeWebSearch) -> Self {
        Self::with_reranker(llm, retriever, PassthroughReranker::new(), web)
    }

    pub fn with_reranker(
        llm: ScriptedLlm,
        retriever: FakeRetriever,
        reranker: PassthroughReranker,
        web: FakeWebSearch,
    ) -> Self {
        let llm = Arc::new(llm);
        let retriever = Arc::new(retriever);
        let reranker = Arc::new(reranker);
        let web = Arc::new(web);

        let engine = QueryEngine::new(retriever.clone(), reranker.clone(), llm.clone());
        let pipeline = Pipeline::new(llm.clone(), Arc::new(engine), web.clone());

        Self {
            llm,
            retriever,
            reranker,
            web,
            pipeline,
        }
    }
}
