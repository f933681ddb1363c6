//! PDF text extraction

use crate::error::{HrError, Result};
use std::path::Path;

/// Extracts plain text from PDF documents
pub struct PdfProcessor;

impl PdfProcessor {
    /// Extract the text of every page, joined and whitespace-trimmed
    pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(HrError::Pdf(format!("PDF file not found: {}", path.display())));
        }

        let text = pdf_extract::extract_text(path)?;
        let text = text
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n");
        Ok(text.trim().to_string())
    }

    /// Like [`extract_text`](Self::extract_text) but returns an empty string on failure
    pub fn read_pdf<P: AsRef<Path>>(path: P) -> String {
        let path = path.as_ref();
        match Self::extract_text(path) {
            Ok(text) => {
                log::info!("PDF read: {}", path.display());
                text
            }
            Err(e) => {
                log::error!("Failed to read PDF {}: {}", path.display(), e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_pdf() {
        let err = PdfProcessor::extract_text("/definitely/not/here.pdf").unwrap_err();
        assert!(matches!(err, HrError::Pdf(_)));
        assert_eq!(PdfProcessor::read_pdf("/definitely/not/here.pdf"), "");
    }

    #[test]
    fn test_garbage_pdf_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();
        assert_eq!(PdfProcessor::read_pdf(&path), "");
    }
}
