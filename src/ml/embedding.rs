//! Embedding generation
//!
//! Two embedders sit behind the [`Embedder`] trait: the OpenAI embeddings API
//! and a deterministic hashed bag-of-words model that needs no network.

use crate::config::{Config, EmbeddingBackendKind};
use crate::error::{HrError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::CreateEmbeddingRequestArgs;
use async_openai::Client;
use lru::LruCache;
use rayon::prelude::*;
use std::num::NonZeroUsize;
use std::sync::Mutex;

/// Embedding vector type
pub type Embedding = Vec<f32>;

/// Turns text into fixed-size vectors
pub trait Embedder {
    /// Stable identifier written into index manifests
    fn name(&self) -> String;

    /// Embed a batch of texts, one vector per text in input order
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Embedding>>;

    /// Embed a single query
    async fn embed_query(&self, text: &str) -> Result<Embedding>;
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &b| (hash ^ b as u64).wrapping_mul(FNV_PRIME))
}

/// Deterministic local embedder: hashed, signed token counts, L2-normalized
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Embed synchronously
    pub fn encode(&self, text: &str) -> Embedding {
        let mut vector = vec![0.0f32; self.dimension];

        let lowered = text.to_lowercase();
        for token in lowered
            .split(|c: char| !c.is_alphanumeric() && c != '+' && c != '#')
            .filter(|t| !t.is_empty())
        {
            let hash = fnv1a(token.as_bytes());
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if (hash >> 63) == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

impl Embedder for HashEmbedder {
    fn name(&self) -> String {
        format!("hashed-bow-{}", self.dimension)
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        Ok(texts.par_iter().map(|text| self.encode(text)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Embedding> {
        Ok(self.encode(text))
    }
}

/// Embedder backed by the OpenAI embeddings endpoint
pub struct OpenAiEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
    /// Query embeddings, keyed by query text
    cache: Mutex<LruCache<String, Embedding>>,
}

/// Inputs sent per embeddings request
const EMBEDDING_BATCH_SIZE: usize = 256;

impl OpenAiEmbedder {
    pub fn new(client: Client<OpenAIConfig>, model: &str, cache_capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            client,
            model: model.to_string(),
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    async fn request(&self, texts: Vec<String>) -> Result<Vec<Embedding>> {
        let expected = texts.len();
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(texts)
            .build()?;

        let response = self.client.embeddings().create(request).await?;
        log::debug!(
            "Embedding request: {} inputs, {} prompt tokens",
            expected,
            response.usage.prompt_tokens
        );

        let mut data = response.data;
        data.sort_by_key(|item| item.index);
        if data.len() != expected {
            return Err(HrError::Embedding(format!(
                "Expected {} embeddings, received {}",
                expected,
                data.len()
            )));
        }
        Ok(data.into_iter().map(|item| item.embedding).collect())
    }

    fn cached(&self, text: &str) -> Option<Embedding> {
        self.cache.lock().ok()?.get(text).cloned()
    }
}

impl Embedder for OpenAiEmbedder {
    fn name(&self) -> String {
        format!("openai-{}", self.model)
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(EMBEDDING_BATCH_SIZE) {
            embeddings.extend(self.request(batch.to_vec()).await?);
        }
        Ok(embeddings)
    }

    async fn embed_query(&self, text: &str) -> Result<Embedding> {
        if let Some(embedding) = self.cached(text) {
            log::debug!("Query embedding cache hit");
            return Ok(embedding);
        }

        let embedding = self
            .request(vec![text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| HrError::Embedding("Empty embedding response".to_string()))?;

        if let Ok(mut cache) = self.cache.lock() {
            cache.put(text.to_string(), embedding.clone());
        }
        Ok(embedding)
    }
}

/// Embedder selected at runtime from configuration
pub enum EmbeddingBackend {
    OpenAi(OpenAiEmbedder),
    Hashed(HashEmbedder),
}

impl EmbeddingBackend {
    pub fn from_config(config: &Config, client: &Client<OpenAIConfig>) -> Self {
        match config.embedding.backend {
            EmbeddingBackendKind::OpenAi => {
                log::info!("Using OpenAI embeddings ({})", config.embedding.model);
                EmbeddingBackend::OpenAi(OpenAiEmbedder::new(
                    client.clone(),
                    &config.embedding.model,
                    config.embedding.cache_capacity,
                ))
            }
            EmbeddingBackendKind::Hashed => {
                log::info!(
                    "Using hashed local embeddings (dimension {})",
                    config.embedding.hashed_dimension
                );
                EmbeddingBackend::Hashed(HashEmbedder::new(config.embedding.hashed_dimension))
            }
        }
    }
}

impl Embedder for EmbeddingBackend {
    fn name(&self) -> String {
        match self {
            EmbeddingBackend::OpenAi(e) => e.name(),
            EmbeddingBackend::Hashed(e) => e.name(),
        }
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        match self {
            EmbeddingBackend::OpenAi(e) => e.embed_documents(texts).await,
            EmbeddingBackend::Hashed(e) => e.embed_documents(texts).await,
        }
    }

    async fn embed_query(&self, text: &str) -> Result<Embedding> {
        match self {
            EmbeddingBackend::OpenAi(e) => e.embed_query(text).await,
            EmbeddingBackend::Hashed(e) => e.embed_query(text).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hash_embedding_is_deterministic_and_normalized() {
        let embedder = HashEmbedder::new(64);
        let a = embedder.encode("Python developer, Django, PostgreSQL");
        let b = embedder.encode("Python developer, Django, PostgreSQL");

        assert_eq!(a.len(), 64);
        assert_eq!(a, b);
        let norm = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert_relative_eq!(norm, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_hash_embedding_ignores_case_and_punctuation() {
        let embedder = HashEmbedder::default();
        assert_eq!(embedder.encode("Rust, SQL."), embedder.encode("rust sql"));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashEmbedder::new(16);
        assert!(embedder.encode("  ,. ").iter().all(|&x| x == 0.0));
    }

    #[tokio::test]
    async fn test_batch_matches_single() {
        let embedder = EmbeddingBackend::Hashed(HashEmbedder::new(32));
        let texts = vec!["sales manager".to_string(), "data engineer".to_string()];

        let batch = embedder.embed_documents(&texts).await.unwrap();
        let single = embedder.embed_query("data engineer").await.unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1], single);
        assert_eq!(embedder.name(), "hashed-bow-32");
    }

    #[test]
    fn test_backend_from_config() {
        let mut config = Config::default();
        config.embedding.backend = EmbeddingBackendKind::Hashed;
        config.embedding.hashed_dimension = 128;

        let client = Client::with_config(OpenAIConfig::new().with_api_key("sk-test"));
        let backend = EmbeddingBackend::from_config(&config, &client);
        assert_eq!(backend.name(), "hashed-bow-128");
    }
}
