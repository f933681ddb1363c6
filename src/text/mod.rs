//! Text processing for neurohr
//!
//! This module provides PDF text extraction, the chunk model used by the
//! vector indexes, and markdown splitting for the knowledge base.

pub mod chunking;
pub mod pdf;

// Re-export main types and functions
pub use chunking::{Chunk, ChunkKind, MarkdownSplitter, duplicate_header_lines};
pub use pdf::PdfProcessor;
