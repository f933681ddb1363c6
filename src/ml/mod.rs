//! Vector search for neurohr
//!
//! Embedding generation, exact flat search and persisted chunk indexes.

pub mod embedding;
pub mod index;
pub mod search;

// Re-export main types and functions
pub use embedding::{Embedder, Embedding, EmbeddingBackend, HashEmbedder, OpenAiEmbedder};
pub use index::{IndexManifest, IndexStats, VectorIndex, knowledge_base_from_markdown, knowledge_base_from_text};
pub use search::{DistanceMetric, FlatIndex, SearchHit};
