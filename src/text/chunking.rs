//! Chunk model and knowledge-base splitting
//!
//! A chunk is the unit embedded into a vector index: a short text plus a
//! back-reference to what it summarizes.

use crate::error::{HrError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// What a chunk refers back to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    Vacancy,
    Resume,
    /// Section of the HR answers knowledge base
    Knowledge,
}

/// Text unit stored in a vector index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// The text that gets embedded
    pub text: String,

    /// Record id, or the section header for knowledge-base chunks
    pub reference: String,

    pub kind: ChunkKind,
}

impl Chunk {
    pub fn new(text: impl Into<String>, reference: impl Into<String>, kind: ChunkKind) -> Self {
        Self {
            text: text.into(),
            reference: reference.into(),
            kind,
        }
    }
}

/// Repeat every line starting with `#` as a plain line without the markers,
/// so that header text survives header splitting as content.
pub fn duplicate_header_lines(text: &str) -> String {
    let mut result = Vec::new();
    for line in text.split('\n') {
        if line.starts_with('#') {
            result.push(line);
        }
        result.push(line.trim_start_matches(['#', ' ']));
    }
    result.join("\n")
}

/// Splits markdown into sections at level-1 headers
pub struct MarkdownSplitter {
    header_regex: Regex,
}

impl MarkdownSplitter {
    pub fn new() -> Result<Self> {
        let header_regex = Regex::new(r"^#(?:\s+(.*))?$")
            .map_err(|e| HrError::Generic(format!("Failed to compile header regex: {}", e)))?;
        Ok(Self { header_regex })
    }

    /// One knowledge chunk per section; header lines are dropped from the
    /// content and kept as the chunk reference
    pub fn split(&self, markdown: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut header = String::new();
        let mut lines: Vec<&str> = Vec::new();

        for raw in markdown.lines() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(caps) = self.header_regex.captures(line) {
                Self::flush(&mut chunks, &header, &mut lines);
                header = caps
                    .get(1)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default();
            } else {
                lines.push(line);
            }
        }
        Self::flush(&mut chunks, &header, &mut lines);

        chunks
    }

    fn flush(chunks: &mut Vec<Chunk>, header: &str, lines: &mut Vec<&str>) {
        if lines.is_empty() {
            return;
        }
        chunks.push(Chunk::new(lines.join("\n"), header, ChunkKind::Knowledge));
        lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANSWERS: &str = "# About the company\nWe build tools.\n\n# Benefits\nHealth insurance.\n## Details\nGym membership.";

    #[test]
    fn test_duplicate_header_lines() {
        let text = "# Title\nbody\n## Sub";
        assert_eq!(duplicate_header_lines(text), "# Title\nTitle\nbody\n## Sub\nSub");
    }

    #[test]
    fn test_split_on_level_one_headers() {
        let splitter = MarkdownSplitter::new().unwrap();
        let chunks = splitter.split(ANSWERS);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].reference, "About the company");
        assert_eq!(chunks[0].text, "We build tools.");
        assert_eq!(chunks[1].reference, "Benefits");
        // deeper headers stay in the section content
        assert_eq!(chunks[1].text, "Health insurance.\n## Details\nGym membership.");
        assert!(chunks.iter().all(|c| c.kind == ChunkKind::Knowledge));
    }

    #[test]
    fn test_split_keeps_header_text_after_duplication() {
        let splitter = MarkdownSplitter::new().unwrap();
        let chunks = splitter.split(&duplicate_header_lines(ANSWERS));

        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].text.starts_with("About the company\n"));
        assert!(chunks[1].text.contains("Details"));
    }

    #[test]
    fn test_preamble_without_header() {
        let splitter = MarkdownSplitter::new().unwrap();
        let chunks = splitter.split("intro line\n# Section\ncontent");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].reference, "");
        assert_eq!(chunks[0].text, "intro line");
    }

    #[test]
    fn test_chunk_serialization() {
        let chunk = Chunk::new("1.Position: QA", "qa_1", ChunkKind::Vacancy);
        let json = serde_json::to_string(&chunk).unwrap();
        assert!(json.contains("\"kind\":\"vacancy\""));
        let back: Chunk = serde_json::from_str(&json).unwrap();
        assert_eq!(chunk, back);
    }
}
