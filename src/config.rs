//! Configuration management for Hieren
//!
//! Built-in defaults, overlaid by an optional TOML file
//! (`~/.hieren/config.toml` unless `--config` is given), overlaid by
//! environment variables. A `.env` file in the working directory is read
//! first. API keys are only ever taken from the environment.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable names
pub mod env {
    pub const GROQ_API_KEY: &str = "GROQ_API_KEY";
    pub const GROQ_MODEL: &str = "GROQ_MODEL";
    pub const COHERE_API_KEY: &str = "COHERE_API_KEY";
    pub const TAVILY_API_KEY: &str = "TAVILY_API_KEY";
    pub const QDRANT_URL: &str = "QDRANT_URL";
    pub const QDRANT_API_KEY: &str = "QDRANT_API_KEY";
    pub const QDRANT_COLLECTION: &str = "QDRANT_COLLECTION";
    pub const EMBEDDING_MODEL: &str = "EMBEDDING_MODEL";
}

/// Complete configuration for the pipeline and its collaborators
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub vector: VectorSettings,
    #[serde(default)]
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub rerank: RerankSettings,
    #[serde(default)]
    pub web: WebSettings,
    #[serde(default)]
    pub resilience: ResilienceSettings,
    #[serde(default)]
    pub serving: ServingSettings,
}

/// Language model (OpenAI-compatible chat completions) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    #[serde(skip)]
    pub api_key: Option<String>,
}

/// Vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorSettings {
    pub url: String,
    pub collection: String,
    /// Candidates requested from the index
    pub similarity_top_k: usize,
    #[serde(skip)]
    pub api_key: Option<String>,
}

/// Query embedding model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub model_id: String,
    pub dimension: usize,
}

/// Reranker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankSettings {
    pub base_url: String,
    pub model: String,
    /// Chunks kept after reranking
    pub top_n: usize,
    #[serde(skip)]
    pub api_key: Option<String>,
}

/// Web search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSettings {
    pub base_url: String,
    /// Results used as answer context and citations
    pub max_results: usize,
    #[serde(skip)]
    pub api_key: Option<String>,
}

/// Retry configuration for engine construction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceSettings {
    pub max_attempts: u32,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub jitter: bool,
}

/// Settings for the layer invoking the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServingSettings {
    pub request_timeout_secs: u64,
    pub default_user: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.0,
            max_tokens: 2048,
            timeout_secs: 60,
            api_key: None,
        }
    }
}

impl Default for VectorSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            collection: "hieren-manuals".to_string(),
            similarity_top_k: 15,
            api_key: None,
        }
    }
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model_id: "BAAI/bge-large-en-v1.5".to_string(),
            dimension: 1024,
        }
    }
}

impl Default for RerankSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.cohere.com".to_string(),
            model: "rerank-multilingual-v3.0".to_string(),
            top_n: 5,
            api_key: None,
        }
    }
}

impl Default for WebSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.tavily.com".to_string(),
            max_results: 3,
            api_key: None,
        }
    }
}

impl Default for ResilienceSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_delay_ms: 2000,
            max_delay_ms: 10000,
            jitter: false,
        }
    }
}

impl Default for ServingSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 120,
            default_user: "guest".to_string(),
        }
    }
}

impl Settings {
    /// Load settings: defaults, then TOML file, then environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // Missing .env is not an error
        let _ = dotenvy::dotenv();

        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        let mut settings = if config_path.exists() {
            Self::from_file(&config_path)?
        } else if path.is_some() {
            anyhow::bail!("Config file not found: {}", config_path.display());
        } else {
            Self::default()
        };

        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Parse a TOML settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(settings)
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;

        Ok(home.join(".hieren").join("config.toml"))
    }

    /// Overlay values found through `lookup` (normally the process environment)
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(env::GROQ_API_KEY) {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = get(env::GROQ_MODEL) {
            self.llm.model = model;
        }
        if let Some(key) = get(env::COHERE_API_KEY) {
            self.rerank.api_key = Some(key);
        }
        if let Some(key) = get(env::TAVILY_API_KEY) {
            self.web.api_key = Some(key);
        }
        if let Some(url) = get(env::QDRANT_URL) {
            self.vector.url = url;
        }
        if let Some(key) = get(env::QDRANT_API_KEY) {
            self.vector.api_key = Some(key);
        }
        if let Some(collection) = get(env::QDRANT_COLLECTION) {
            self.vector.collection = collection;
        }
        if let Some(model) = get(env::EMBEDDING_MODEL) {
            self.embedding.model_id = model;
        }
    }

    /// Render non-secret settings as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Save settings to a TOML file (secrets are never written)
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        fs::write(path, self.to_toml()?).context("Failed to write config file")?;

        Ok(())
    }
}
