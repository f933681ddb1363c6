//! Persisted vector index over chunks
//!
//! An index is stored as two files inside a folder: `{name}.vectors` holds the
//! bincode-encoded embedding matrix and `{name}.json` the manifest (embedder,
//! dimension, metric and the chunk list in row order).

use crate::error::{HrError, Result};
use crate::ml::embedding::{Embedder, Embedding};
use crate::ml::search::{DistanceMetric, FlatIndex};
use crate::text::{Chunk, MarkdownSplitter, duplicate_header_lines};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Manifest persisted next to the vectors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexManifest {
    /// Name of the embedder that produced the vectors
    pub embedder: String,
    pub dimension: usize,
    pub metric: DistanceMetric,
    /// Chunks in matrix row order
    pub chunks: Vec<Chunk>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Index statistics
#[derive(Debug, Clone)]
pub struct IndexStats {
    pub total_chunks: usize,
    pub dimension: usize,
    pub embedder: String,
}

/// Embedding index over a chunk list; rebuilt wholesale, never updated in place
#[derive(Debug, Clone)]
pub struct VectorIndex {
    manifest: IndexManifest,
    flat: FlatIndex,
}

fn vectors_path(folder: &Path, name: &str) -> PathBuf {
    folder.join(format!("{}.vectors", name))
}

fn manifest_path(folder: &Path, name: &str) -> PathBuf {
    folder.join(format!("{}.json", name))
}

impl VectorIndex {
    /// Embed `chunks` and build an index; an empty chunk list is an error
    pub async fn build<E: Embedder>(embedder: &E, chunks: Vec<Chunk>) -> Result<Self> {
        if chunks.is_empty() {
            return Err(HrError::Index("Cannot build an index from an empty chunk list".to_string()));
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = embedder.embed_documents(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(HrError::Embedding(format!(
                "Embedder returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }

        let flat = FlatIndex::from_vectors(vectors, DistanceMetric::SquaredL2)?;
        let manifest = IndexManifest {
            embedder: embedder.name(),
            dimension: flat.dimension(),
            metric: flat.metric(),
            chunks,
            created_at: chrono::Utc::now(),
        };

        log::info!(
            "Built index with {} chunks, dimension {}",
            manifest.chunks.len(),
            manifest.dimension
        );
        Ok(Self { manifest, flat })
    }

    /// Build and persist as `folder/name`
    pub async fn build_and_save<E: Embedder>(
        embedder: &E,
        chunks: Vec<Chunk>,
        folder: &Path,
        name: &str,
    ) -> Result<Self> {
        let index = Self::build(embedder, chunks).await?;
        index.save(folder, name)?;
        Ok(index)
    }

    /// Write both index files, replacing any previous ones
    pub fn save(&self, folder: &Path, name: &str) -> Result<()> {
        std::fs::create_dir_all(folder)?;

        let data = bincode::serialize(self.flat.vectors())?;
        std::fs::write(vectors_path(folder, name), data)?;

        let manifest = serde_json::to_string_pretty(&self.manifest)?;
        std::fs::write(manifest_path(folder, name), manifest)?;

        log::info!("Saved index '{}' to {}", name, folder.display());
        Ok(())
    }

    /// Load a persisted index; `None` when files are missing, corrupt or were
    /// produced by a different embedder
    pub fn load<E: Embedder>(embedder: &E, folder: &Path, name: &str) -> Option<Self> {
        match Self::try_load(embedder, folder, name) {
            Ok(index) => {
                log::info!("Loaded index '{}' with {} chunks", name, index.len());
                Some(index)
            }
            Err(e) => {
                log::error!("Failed to load index '{}' from {}: {}", name, folder.display(), e);
                None
            }
        }
    }

    fn try_load<E: Embedder>(embedder: &E, folder: &Path, name: &str) -> Result<Self> {
        let manifest_data = std::fs::read_to_string(manifest_path(folder, name))?;
        let manifest: IndexManifest = serde_json::from_str(&manifest_data)?;

        let expected = embedder.name();
        if manifest.embedder != expected {
            return Err(HrError::Index(format!(
                "Index was built with '{}', current embedder is '{}'",
                manifest.embedder, expected
            )));
        }

        let vectors_data = std::fs::read(vectors_path(folder, name))?;
        let vectors: Vec<Embedding> = bincode::deserialize(&vectors_data)?;
        if vectors.len() != manifest.chunks.len() {
            return Err(HrError::Index(format!(
                "Index holds {} vectors but {} chunks",
                vectors.len(),
                manifest.chunks.len()
            )));
        }

        let flat = FlatIndex::from_vectors(vectors, manifest.metric)?;
        if flat.dimension() != manifest.dimension {
            return Err(HrError::Index(format!(
                "Manifest dimension {} doesn't match stored vectors ({})",
                manifest.dimension,
                flat.dimension()
            )));
        }

        Ok(Self { manifest, flat })
    }

    /// Up to `k` closest chunks with their distances, closest first
    pub async fn search_chunks<E: Embedder>(&self, embedder: &E, query: &str, k: usize) -> Result<Vec<(f32, &Chunk)>> {
        if k == 0 || self.flat.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = embedder.embed_query(query).await?;
        let hits = self.flat.search(&query_embedding, k)?;

        Ok(hits
            .into_iter()
            .filter_map(|hit| self.manifest.chunks.get(hit.row).map(|chunk| (hit.distance, chunk)))
            .collect())
    }

    /// `(score, reference)` pairs for the `k` closest chunks; empty on failure
    pub async fn similarity_search<E: Embedder>(&self, embedder: &E, query: &str, k: usize) -> Vec<(f32, String)> {
        match self.search_chunks(embedder, query, k).await {
            Ok(results) => results
                .into_iter()
                .map(|(score, chunk)| (score, chunk.reference.clone()))
                .collect(),
            Err(e) => {
                log::error!("Similarity search failed: {}", e);
                Vec::new()
            }
        }
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.manifest.chunks
    }

    pub fn len(&self) -> usize {
        self.manifest.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifest.chunks.is_empty()
    }

    pub fn get_stats(&self) -> IndexStats {
        IndexStats {
            total_chunks: self.len(),
            dimension: self.manifest.dimension,
            embedder: self.manifest.embedder.clone(),
        }
    }
}

/// Index a markdown answer sheet: header lines are duplicated as content,
/// then the text is split at level-1 headers. `None` on failure.
pub async fn knowledge_base_from_markdown<E: Embedder>(
    embedder: &E,
    markdown_path: &Path,
    folder: &Path,
    name: &str,
) -> Option<VectorIndex> {
    match build_knowledge_base(embedder, markdown_path, folder, name).await {
        Ok(index) => Some(index),
        Err(e) => {
            log::error!(
                "Failed to build knowledge base from {}: {}",
                markdown_path.display(),
                e
            );
            None
        }
    }
}

async fn build_knowledge_base<E: Embedder>(
    embedder: &E,
    markdown_path: &Path,
    folder: &Path,
    name: &str,
) -> Result<VectorIndex> {
    let markdown = std::fs::read_to_string(markdown_path)?;
    build_knowledge_base_text(embedder, &markdown, folder, name).await
}

/// Same as [`knowledge_base_from_markdown`] for markdown already in memory
pub async fn knowledge_base_from_text<E: Embedder>(
    embedder: &E,
    markdown: &str,
    folder: &Path,
    name: &str,
) -> Option<VectorIndex> {
    match build_knowledge_base_text(embedder, markdown, folder, name).await {
        Ok(index) => Some(index),
        Err(e) => {
            log::error!("Failed to build knowledge base '{}': {}", name, e);
            None
        }
    }
}

async fn build_knowledge_base_text<E: Embedder>(
    embedder: &E,
    markdown: &str,
    folder: &Path,
    name: &str,
) -> Result<VectorIndex> {
    let splitter = MarkdownSplitter::new()?;
    let chunks = splitter.split(&duplicate_header_lines(markdown));
    log::info!("Knowledge base split into {} sections", chunks.len());

    VectorIndex::build_and_save(embedder, chunks, folder, name).await
}
