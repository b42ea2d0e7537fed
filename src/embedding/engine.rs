// Local BGE embeddings via Candle
use anyhow::{Context, Result};
use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::{api::sync::Api, Repo, RepoType};
use std::sync::Arc;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::info;

use crate::config::EmbeddingSettings;
use crate::embedding::Embedder;
use crate::errors::PipelineError;

/// BERT context limit
const MAX_SEQUENCE_LEN: usize = 512;

/// Embedding engine running a BERT-family model on CPU
#[derive(Clone)]
pub struct EmbeddingEngine {
    model: Arc<BertModel>,
    tokenizer: Arc<Tokenizer>,
    device: Device,
    dimension: usize,
}

impl EmbeddingEngine {
    /// Load the configured model (downloads on first use)
    pub fn load(settings: &EmbeddingSettings) -> Result<Self> {
        let device = Device::Cpu;

        let api = Api::new().context("Failed to create HuggingFace API client")?;
        let repo = api.repo(Repo::new(settings.model_id.clone(), RepoType::Model));

        let config_path = repo.get("config.json")
            .context("Failed to download model config")?;
        let tokenizer_path = repo.get("tokenizer.json")
            .context("Failed to download tokenizer")?;
        let weights_path = repo.get("model.safetensors")
            .context("Failed to download model weights")?;

        let config_contents = std::fs::read_to_string(config_path)
            .context("Failed to read config file")?;
        let config: Config = serde_json::from_str(&config_contents)
            .context("Failed to parse model config")?;
        let dimension = hidden_size(&config_contents)?;

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_LEN,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .context("Failed to load model weights")?
        };

        let model = BertModel::load(vb, &config)
            .context("Failed to create BERT model")?;

        info!(model = %settings.model_id, dimension, "embedding model loaded");

        Ok(Self {
            model: Arc::new(model),
            tokenizer: Arc::new(tokenizer),
            device,
            dimension,
        })
    }

    /// Generate embedding for a single text
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])?
            .pop()
            .context("Embedding batch returned no vectors")
    }

    /// Generate normalized embeddings for multiple texts
    pub fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let encodings = self.tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

        let max_len = encodings.iter().map(|e| e.get_ids().len()).max().unwrap_or(0);
        let batch_size = texts.len();

        let mut padded_ids = vec![vec![0u32; max_len]; batch_size];
        let mut padded_mask = vec![vec![0u32; max_len]; batch_size];

        for (i, encoding) in encodings.iter().enumerate() {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();
            padded_ids[i][..ids.len()].copy_from_slice(ids);
            padded_mask[i][..mask.len()].copy_from_slice(mask);
        }

        let flat_ids: Vec<u32> = padded_ids.into_iter().flatten().collect();
        let flat_mask: Vec<u32> = padded_mask.into_iter().flatten().collect();

        let token_ids = Tensor::from_vec(flat_ids, (batch_size, max_len), &self.device)?;
        let attention_mask = Tensor::from_vec(flat_mask, (batch_size, max_len), &self.device)?;
        let token_type_ids = token_ids.zeros_like()?;

        let hidden = self.model.forward(&token_ids, &token_type_ids, Some(&attention_mask))?;

        // BGE uses the [CLS] vector, L2-normalized
        let pooled = Self::cls_pool(&hidden)?;
        let normalized = Self::l2_normalize(&pooled)?;

        Ok(normalized.to_vec2::<f32>()?)
    }

    fn cls_pool(hidden: &Tensor) -> Result<Tensor> {
        Ok(hidden.narrow(1, 0, 1)?.squeeze(1)?)
    }

    fn l2_normalize(vectors: &Tensor) -> Result<Tensor> {
        let norms = vectors.sqr()?.sum_keepdim(1)?.sqrt()?.clamp(1e-12, f64::MAX)?;
        Ok(vectors.broadcast_div(&norms)?)
    }
}

/// Output width declared by a model's `config.json`
fn hidden_size(config_json: &str) -> Result<usize> {
    let value: serde_json::Value =
        serde_json::from_str(config_json).context("Failed to parse model config")?;
    value
        .get("hidden_size")
        .and_then(serde_json::Value::as_u64)
        .map(|n| n as usize)
        .context("Model config has no hidden_size")
}

#[async_trait]
impl Embedder for EmbeddingEngine {
    async fn embed_query(&self, text: &str) -> crate::errors::Result<Vec<f32>> {
        let engine = self.clone();
        let text = text.to_string();

        tokio::task::spawn_blocking(move || engine.embed(&text))
            .await
            .map_err(|e| PipelineError::Embedding(format!("Embedding task failed: {}", e)))?
            .map_err(|e| PipelineError::Embedding(format!("{:#}", e)))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
