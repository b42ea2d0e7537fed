//! Tavily search API client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::WebSettings;
use crate::errors::{PipelineError, Result};
use crate::websearch::{SearchDepth, WebResult, WebSearch};

/// Request timeout (30 seconds)
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Tavily search client
#[derive(Debug, Clone)]
pub struct TavilyClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TavilyClient {
    /// Create client from settings; fails when no API key is configured
    pub fn from_settings(settings: &WebSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or_else(|| PipelineError::Config("TAVILY_API_KEY is not set".to_string()))?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(PipelineError::Http)?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl WebSearch for TavilyClient {
    async fn search(&self, query: &str, depth: SearchDepth) -> Result<Vec<WebResult>> {
        let url = format!("{}/search", self.base_url);

        let request = SearchRequest {
            api_key: &self.api_key,
            query,
            search_depth: depth,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::WebSearch(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PipelineError::WebSearch(format!("HTTP {}: {}", status, error_text)));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::WebSearch(format!("Failed to parse response: {}", e)))?;

        debug!(results = body.results.len(), "web search complete");
        Ok(body.results)
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: SearchDepth,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<WebResult>,
}
