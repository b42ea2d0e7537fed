//! Web search seam for market/news-type questions

pub mod tavily;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::config::WebSettings;
use crate::errors::{PipelineError, Result};
use crate::types::Citation;

pub use tavily::TavilyClient;

/// How much effort the search provider spends per query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    #[default]
    Basic,
    Advanced,
}

/// One search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebResult {
    #[serde(default)]
    pub title: Option<String>,
    pub url: String,
    #[serde(default)]
    pub content: String,
}

impl WebResult {
    /// Citation naming the page by title, or by URL when untitled
    pub fn citation(&self) -> Citation {
        let document = self
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.url)
            .to_string();

        Citation::Web {
            document,
            url: self.url.clone(),
        }
    }
}

/// Real-time information lookup
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, depth: SearchDepth) -> Result<Vec<WebResult>>;
}

/// Stand-in used when no search provider is configured
///
/// Every search fails with a configuration error, so only the market path
/// degrades while technical and action queries keep working.
#[derive(Debug, Clone)]
pub struct UnconfiguredWebSearch {
    reason: String,
}

impl UnconfiguredWebSearch {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl WebSearch for UnconfiguredWebSearch {
    async fn search(&self, _query: &str, _depth: SearchDepth) -> Result<Vec<WebResult>> {
        Err(PipelineError::Config(self.reason.clone()))
    }
}

/// Tavily when a key is configured, otherwise a stand-in that always fails
pub fn web_search_from_settings(settings: &WebSettings) -> Result<Arc<dyn WebSearch>> {
    match TavilyClient::from_settings(settings) {
        Ok(client) => Ok(Arc::new(client)),
        Err(PipelineError::Config(reason)) => {
            warn!(%reason, "web search disabled, market questions will fail");
            Ok(Arc::new(UnconfiguredWebSearch::new(reason)))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citation_prefers_title() {
        let result = WebResult {
            title: Some("Harga Panel Surya 2026".to_string()),
            url: "https://example.com/harga".to_string(),
            content: String::new(),
        };
        assert_eq!(result.citation().document(), "Harga Panel Surya 2026");
        assert_eq!(result.citation().url(), Some("https://example.com/harga"));
    }

    #[test]
    fn test_citation_falls_back_to_url() {
        let result = WebResult {
            title: None,
            url: "https://example.com/a".to_string(),
            content: String::new(),
        };
        assert_eq!(result.citation().document(), "https://example.com/a");
    }

    #[tokio::test]
    async fn test_unconfigured_search_fails() {
        let search = UnconfiguredWebSearch::new("TAVILY_API_KEY is not set");
        let err = search.search("Harga panel", SearchDepth::Basic).await.unwrap_err();
        assert!(err.to_string().contains("TAVILY_API_KEY"));
    }

    #[tokio::test]
    async fn test_factory_without_key_degrades() {
        let search = web_search_from_settings(&WebSettings::default()).unwrap();
        assert!(matches!(
            search.search("Harga panel", SearchDepth::Basic).await,
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_search_depth_wire_format() {
        assert_eq!(serde_json::to_string(&SearchDepth::Basic).unwrap(), "\"basic\"");
        assert_eq!(SearchDepth::default(), SearchDepth::Basic);
    }
}
