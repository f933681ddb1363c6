//! PDF ingestion: text extraction, field extraction, storage and index rebuild

use crate::api::HrSystem;
use crate::llm::{ChatModel, Extractor};
use crate::ml::{Embedder, VectorIndex};
use crate::speech::Speaker;
use crate::storage::{IngestStats, Record, RecordKind, ResumeRecord, VacancyRecord};
use crate::text::PdfProcessor;
use crate::utils::{document_id_from_file_name, list_files_with_extension};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Instant;

/// Outcome of a `process` run
#[derive(Debug, Clone, Default)]
pub struct ProcessReport {
    pub vacancies: IngestStats,
    pub resumes: IngestStats,
}

fn progress_bar(len: usize, kind: RecordKind) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    bar.set_style(style);
    bar.set_message(format!("Parsing {} files", kind));
    bar
}

impl<M, E, S> HrSystem<M, E, S>
where
    M: ChatModel,
    E: Embedder,
    S: Speaker,
{
    /// Parse every PDF of both kinds, save the records and rebuild both indexes
    pub async fn process_pdf_files(&self) -> ProcessReport {
        log::info!("Processing PDF files...");
        let layout = self.store.layout();

        let vacancy_files = list_files_with_extension(&layout.vacancies_pdf, "pdf").unwrap_or_default();
        let resume_files = list_files_with_extension(&layout.resumes_pdf, "pdf").unwrap_or_default();

        println!("Found {} vacancy PDF files", vacancy_files.len());
        println!("Found {} resume PDF files", resume_files.len());

        let mut report = ProcessReport::default();
        if !vacancy_files.is_empty() {
            println!("\nParsing vacancy PDF files...");
            report.vacancies = self.ingest_kind(RecordKind::Vacancy).await;
        }
        if !resume_files.is_empty() {
            println!("\nParsing resume PDF files...");
            report.resumes = self.ingest_kind(RecordKind::Resume).await;
        }

        println!("\nPDF processing finished!");
        report
    }

    /// Ingest the PDF folder of `kind`, then rebuild its index from all stored records
    pub async fn ingest_kind(&self, kind: RecordKind) -> IngestStats {
        let start = Instant::now();
        let mut stats = IngestStats::default();

        let files = match list_files_with_extension(self.store.layout().pdf_dir(kind), "pdf") {
            Ok(files) => files,
            Err(e) => {
                log::error!("Failed to list {} PDF files: {}", kind, e);
                return stats;
            }
        };
        stats.files_found = files.len();

        let bar = progress_bar(files.len(), kind);
        for path in &files {
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();

            if self.ingest_file(kind, path, &file_name, &bar).await {
                stats.records_saved += 1;
            } else {
                stats.files_skipped += 1;
            }
            bar.inc(1);
        }
        bar.finish_and_clear();

        stats.indexed_chunks = self.rebuild_index(kind).await.unwrap_or(0);
        stats.processing_time = start.elapsed().as_secs_f64();
        log::info!(
            "Ingested {} {} files: {} saved, {} skipped, {} indexed in {:.2}s",
            stats.files_found,
            kind,
            stats.records_saved,
            stats.files_skipped,
            stats.indexed_chunks,
            stats.processing_time
        );
        stats
    }

    async fn ingest_file(&self, kind: RecordKind, path: &Path, file_name: &str, bar: &ProgressBar) -> bool {
        let text = PdfProcessor::read_pdf(path);
        if text.is_empty() {
            bar.println(format!("Empty text in file: {}", file_name));
            return false;
        }

        let id = document_id_from_file_name(file_name);
        if self.ingest_text(kind, &id, &text).await {
            bar.println(format!("Processed {}: {}", kind, file_name));
            true
        } else {
            let message = format!("Error while processing file {}", file_name);
            log::error!("{}", message);
            bar.println(message);
            false
        }
    }

    /// Extract fields from `text` and save the record under `id`. A failed
    /// extraction still saves id and raw text.
    pub async fn ingest_text(&self, kind: RecordKind, id: &str, text: &str) -> bool {
        let extractor = Extractor::new(&self.chat, &self.config.llm.default_model)
            .with_temperature(self.config.llm.extraction_temperature);
        let fields = extractor.extract(kind, text).await;
        if fields.is_empty() {
            log::warn!("No fields extracted for {} {}; saving raw text only", kind, id);
        }

        match kind {
            RecordKind::Vacancy => self.store.save(&VacancyRecord::from_fields(id, text, &fields)),
            RecordKind::Resume => self.store.save(&ResumeRecord::from_fields(id, text, &fields)),
        }
    }

    /// Rebuild the index of `kind` from every stored record; chunk count on success
    pub async fn rebuild_index(&self, kind: RecordKind) -> Option<usize> {
        let chunks = self.store.chunks(kind);
        if chunks.is_empty() {
            log::warn!("No stored {} records to index", kind);
            return None;
        }

        let count = chunks.len();
        match VectorIndex::build_and_save(&self.embedder, chunks, &self.store.layout().db, kind.index_name()).await {
            Ok(_) => {
                println!("Built {} index from {} records", kind, count);
                Some(count)
            }
            Err(e) => {
                let message = format!("Error while building {} index: {}", kind, e);
                log::error!("{}", message);
                println!("{}", message);
                None
            }
        }
    }
}
