//! Storage functionality for neurohr
//!
//! This module provides the on-disk data layout and the JSON document store
//! for vacancy and resume records.

pub mod document_store;
pub mod records;

// Re-export main types
pub use document_store::{DataLayout, DocumentStore};
pub use records::{
    FieldMap, NOT_SPECIFIED, Record, RecordKind, ResumeRecord, VacancyRecord, or_not_specified,
};

/// Ingestion statistics for one record kind
#[derive(Debug, Clone, Default)]
pub struct IngestStats {
    /// PDF files found in the source folder
    pub files_found: usize,

    /// Records extracted and saved
    pub records_saved: usize,

    /// Files skipped (empty text or processing failure)
    pub files_skipped: usize,

    /// Chunks written to the rebuilt index
    pub indexed_chunks: usize,

    /// Total processing time in seconds
    pub processing_time: f64,
}
