//! Doctor command for readiness diagnostics
//!
//! Reports whether every collaborator the pipeline needs is configured,
//! and optionally whether the vector index is reachable.

use colored::Colorize;

use crate::config::Settings;
use crate::rag::retrieval::probe_collection;

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Pass,
    Warn(String),
    Fail(String),
}

/// Individual health check
#[derive(Debug)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
}

impl HealthCheck {
    fn new(name: &str, status: HealthStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }
}

/// Doctor diagnostics system
pub struct Doctor {
    settings: Settings,
}

impl Doctor {
    /// Create a new doctor instance
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Run configuration checks
    pub fn run_diagnostics(&self) -> Vec<HealthCheck> {
        vec![
            self.check_language_model(),
            self.check_vector_index(),
            self.check_reranker(),
            self.check_web_search(),
        ]
    }

    /// Run configuration checks plus a live vector index probe
    pub async fn run_live_diagnostics(&self) -> Vec<HealthCheck> {
        let mut checks = self.run_diagnostics();
        checks.push(self.check_collection_reachable().await);
        checks
    }

    /// Check 1: language model credentials
    fn check_language_model(&self) -> HealthCheck {
        let status = if self.settings.llm.api_key.is_some() {
            HealthStatus::Pass
        } else {
            HealthStatus::Fail("GROQ_API_KEY not set; routing and answers unavailable".to_string())
        };
        HealthCheck::new("Language Model", status)
    }

    /// Check 2: vector index location
    fn check_vector_index(&self) -> HealthCheck {
        let vector = &self.settings.vector;
        let status = if vector.url.trim().is_empty() {
            HealthStatus::Fail("Qdrant URL is empty".to_string())
        } else if vector.collection.trim().is_empty() {
            HealthStatus::Fail("Qdrant collection name is empty".to_string())
        } else {
            HealthStatus::Pass
        };
        HealthCheck::new("Vector Index", status)
    }

    /// Check 3: hosted reranker (optional)
    fn check_reranker(&self) -> HealthCheck {
        let status = if self.settings.rerank.api_key.is_some() {
            HealthStatus::Pass
        } else {
            HealthStatus::Warn("COHERE_API_KEY not set; local keyword reranker is used".to_string())
        };
        HealthCheck::new("Reranker", status)
    }

    /// Check 4: web search credentials
    fn check_web_search(&self) -> HealthCheck {
        let status = if self.settings.web.api_key.is_some() {
            HealthStatus::Pass
        } else {
            HealthStatus::Fail("TAVILY_API_KEY not set; market questions unavailable".to_string())
        };
        HealthCheck::new("Web Search", status)
    }

    /// Check 5: collection reachable
    async fn check_collection_reachable(&self) -> HealthCheck {
        let status = match probe_collection(&self.settings.vector).await {
            Ok(0) => HealthStatus::Warn(format!(
                "Collection '{}' is empty",
                self.settings.vector.collection
            )),
            Ok(_) => HealthStatus::Pass,
            Err(e) => HealthStatus::Fail(e.to_string()),
        };
        HealthCheck::new("Collection Reachable", status)
    }

    /// Display diagnostics results
    pub fn display_results(checks: &[HealthCheck]) {
        println!("\n{}\n", "Hieren Readiness Diagnostics".bold());
        println!("{:<22} {}", "Check", "Status");
        println!("{}", "=".repeat(60));

        for check in checks {
            let line = match &check.status {
                HealthStatus::Pass => "PASS".green().to_string(),
                HealthStatus::Warn(msg) => format!("WARN: {}", msg).yellow().to_string(),
                HealthStatus::Fail(msg) => format!("FAIL: {}", msg).red().to_string(),
            };
            println!("{:<22} {}", check.name, line);
        }

        println!();
    }

    /// True when no check failed
    pub fn is_ready(checks: &[HealthCheck]) -> bool {
        !checks.iter().any(|c| matches!(c.status, HealthStatus::Fail(_)))
    }
}
