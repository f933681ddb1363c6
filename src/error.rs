//! Error types for neurohr
//!
//! Internal steps return [`Result`] and propagate with `?`. The outward-facing
//! operations (store, index, matching, interview) convert failures into
//! logged sentinels at their boundary.

use thiserror::Error;

/// Main error type for neurohr operations
#[derive(Error, Debug)]
pub enum HrError {
    /// PDF processing errors
    #[error("PDF processing error: {0}")]
    Pdf(String),

    /// Structured extraction errors
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Chat completion errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Embedding generation errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Vector index errors
    #[error("Index error: {0}")]
    Index(String),

    /// Document store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Text-to-speech errors
    #[error("Speech error: {0}")]
    Speech(String),

    /// Interview flow errors
    #[error("Interview error: {0}")]
    Interview(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// OpenAI client errors
    #[error("OpenAI error: {0}")]
    OpenAi(#[from] async_openai::error::OpenAIError),

    /// Generic errors
    #[error("Generic error: {0}")]
    Generic(String),
}

/// Result type alias for neurohr operations
pub type Result<T> = std::result::Result<T, HrError>;

impl From<bincode::Error> for HrError {
    fn from(err: bincode::Error) -> Self {
        HrError::Index(err.to_string())
    }
}

impl From<pdf_extract::OutputError> for HrError {
    fn from(err: pdf_extract::OutputError) -> Self {
        HrError::Pdf(format!("{err:?}"))
    }
}

impl From<anyhow::Error> for HrError {
    fn from(err: anyhow::Error) -> Self {
        HrError::Generic(err.to_string())
    }
}
