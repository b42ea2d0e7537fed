//! Golden-dataset evaluation
//!
//! Runs a fixed set of questions through the pipeline and scores each
//! answer by keyword hit. Used as a smoke gate before deploying a new index
//! or model.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::info;

use crate::pipeline::Pipeline;
use crate::types::{Intent, Query, Source};

/// Characters of the answer kept in the report
pub const SNIPPET_CHARS: usize = 100;

/// One golden question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalCase {
    pub query: String,
    pub expected_keywords: Vec<String>,
    /// Route the question is expected to take
    pub category: Intent,
}

impl EvalCase {
    pub fn new(query: &str, keywords: &[&str], category: Intent) -> Self {
        Self {
            query: query.to_string(),
            expected_keywords: keywords.iter().map(|k| k.to_string()).collect(),
            category,
        }
    }

    /// Any expected keyword appears in the answer, ignoring case
    pub fn is_hit(&self, response: &str) -> bool {
        let response = response.to_lowercase();
        self.expected_keywords
            .iter()
            .any(|kw| response.contains(&kw.to_lowercase()))
    }
}

/// Outcome of one case
#[derive(Debug, Clone, Serialize)]
pub struct EvalResult {
    pub query: String,
    pub hit: bool,
    pub latency_secs: f64,
    pub expected_category: Intent,
    pub routed_category: Intent,
    pub source: Source,
    pub response_snippet: String,
}

/// Aggregate evaluation report
#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    pub generated_at: DateTime<Utc>,
    pub results: Vec<EvalResult>,
}

impl EvalReport {
    pub fn hits(&self) -> usize {
        self.results.iter().filter(|r| r.hit).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Fraction of cases hit; 0.0 for an empty run
    pub fn accuracy(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        self.hits() as f64 / self.total() as f64
    }

    pub fn average_latency_secs(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        self.results.iter().map(|r| r.latency_secs).sum::<f64>() / self.total() as f64
    }

    /// Cases whose route differs from the expected category
    pub fn misrouted(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.routed_category != r.expected_category)
            .count()
    }
}

/// Built-in golden dataset
pub fn builtin_cases() -> Vec<EvalCase> {
    vec![
        EvalCase::new(
            "Berapa tegangan Voc Inverter X?",
            &["450V", "Voc", "Open Circuit"],
            Intent::Technical,
        ),
        EvalCase::new(
            "Harga panel surya 500Wp hari ini",
            &["Rp", "Juta", "Ribuan"],
            Intent::Market,
        ),
        EvalCase::new(
            "Kenapa inverter error 501?",
            &["Grounding", "Fault", "Kabel"],
            Intent::Technical,
        ),
    ]
}

/// Load cases from a JSON array file
pub fn load_cases(path: &Path) -> Result<Vec<EvalCase>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read eval cases {}", path.display()))?;

    let cases: Vec<EvalCase> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse eval cases {}", path.display()))?;

    if cases.is_empty() {
        anyhow::bail!("No eval cases in {}", path.display());
    }
    Ok(cases)
}

/// Run every case sequentially and collect the report
pub async fn run_evaluation(pipeline: &Pipeline, cases: &[EvalCase]) -> EvalReport {
    let mut results = Vec::with_capacity(cases.len());

    for case in cases {
        info!(query = %case.query, "evaluating case");

        let started = Instant::now();
        let run = pipeline.run(&Query::new(case.query.clone())).await;
        let latency_secs = started.elapsed().as_secs_f64();

        results.push(EvalResult {
            query: case.query.clone(),
            hit: case.is_hit(&run.envelope.response),
            latency_secs,
            expected_category: case.category,
            routed_category: run.intent,
            source: run.envelope.source,
            response_snippet: snippet(&run.envelope.response),
        });
    }

    EvalReport {
        generated_at: Utc::now(),
        results,
    }
}

fn snippet(response: &str) -> String {
    let mut out: String = response.chars().take(SNIPPET_CHARS).collect();
    out.push_str("...");
    out
}
