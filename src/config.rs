//! Configuration for neurohr
//!
//! Defaults are usable offline except for the LLM credentials. `Config::from_env`
//! overlays environment variables (and a `.env` file when present).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the data directory layout
    pub data_path: PathBuf,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub speech: SpeechConfig,
    pub interview: InterviewConfig,
}

/// Chat completion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key for the OpenAI-compatible provider
    pub api_key: String,
    /// Optional base URL for OpenAI-compatible APIs
    pub base_url: Option<String>,
    /// Model used for extraction and knowledge-base answers
    pub default_model: String,
    /// Model used for follow-up questions and the assessment
    pub interview_model: String,
    /// Temperature for extraction calls
    pub extraction_temperature: f32,
    /// Temperature for analysis prompts (requirements, assessment, follow-ups)
    pub analysis_temperature: f32,
    /// Temperature for candidate Q&A answers
    pub answer_temperature: f32,
}

/// Which embedder backs the vector indexes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackendKind {
    /// OpenAI embeddings API
    OpenAi,
    /// Local hashed bag-of-words vectors
    Hashed,
}

/// Embedding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackendKind,
    /// Remote embedding model name
    pub model: String,
    /// Vector size of the hashed backend
    pub hashed_dimension: usize,
    /// Number of query embeddings kept in memory
    pub cache_capacity: usize,
}

/// Text-to-speech settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    pub enabled: bool,
    pub model: String,
    pub voice: String,
    /// Directory receiving the synthesized audio file
    pub output_dir: PathBuf,
}

/// Interview flow settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewConfig {
    /// Phrase that ends the candidate Q&A loop (case-insensitive)
    pub exit_phrase: String,
    /// Line width used when displaying dialogue
    pub wrap_width: usize,
    /// Knowledge-base chunks used as context per candidate question
    pub knowledge_top_k: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            default_model: "gpt-3.5-turbo".to_string(),
            interview_model: "gpt-4o".to_string(),
            extraction_temperature: 0.0,
            analysis_temperature: 0.1,
            answer_temperature: 0.3,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackendKind::OpenAi,
            model: "text-embedding-ada-002".to_string(),
            hashed_dimension: 384,
            cache_capacity: 256,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            output_dir: PathBuf::from("./audio"),
        }
    }
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            exit_phrase: "no questions".to_string(),
            wrap_width: 120,
            knowledge_top_k: 3,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("./data"),
            llm: LlmConfig::default(),
            embedding: EmbeddingConfig::default(),
            speech: SpeechConfig::default(),
            interview: InterviewConfig::default(),
        }
    }
}

impl Config {
    /// Build configuration from defaults plus environment overrides
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values produced by `lookup` on top of `self`
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup("OPENAI_API_KEY") {
            Some(key) if !key.trim().is_empty() => self.llm.api_key = key,
            _ => log::warn!("OPENAI_API_KEY is not set; LLM calls will fail"),
        }
        if let Some(url) = lookup("OPENAI_BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.llm.base_url = Some(url);
        }
        if let Some(model) = lookup("DEFAULT_MODEL").filter(|v| !v.trim().is_empty()) {
            self.llm.default_model = model;
        }
        if let Some(model) = lookup("INTERVIEW_MODEL").filter(|v| !v.trim().is_empty()) {
            self.llm.interview_model = model;
        }
        if let Some(backend) = lookup("NEUROHR_EMBEDDINGS") {
            match backend.trim().to_lowercase().as_str() {
                "openai" => self.embedding.backend = EmbeddingBackendKind::OpenAi,
                "hashed" | "local" => self.embedding.backend = EmbeddingBackendKind::Hashed,
                other => log::warn!("Unknown NEUROHR_EMBEDDINGS value '{}', keeping default", other),
            }
        }
        if let Some(speech) = lookup("NEUROHR_SPEECH") {
            self.speech.enabled = !matches!(
                speech.trim().to_lowercase().as_str(),
                "off" | "0" | "false" | "no"
            );
        }
        if let Some(voice) = lookup("NEUROHR_TTS_VOICE").filter(|v| !v.trim().is_empty()) {
            self.speech.voice = voice;
        }
        if let Some(phrase) = lookup("NEUROHR_EXIT_PHRASE").filter(|v| !v.trim().is_empty()) {
            self.interview.exit_phrase = phrase;
        }
        self
    }

    /// Replace the data directory
    pub fn with_data_path<P: Into<PathBuf>>(mut self, data_path: P) -> Self {
        self.data_path = data_path.into();
        self
    }
}
