//! Record definitions for vacancies and resumes

use crate::error::{HrError, Result};
use crate::text::{Chunk, ChunkKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Structured fields returned by extraction, keyed by field name
pub type FieldMap = BTreeMap<String, String>;

/// Text shown in place of a missing field
pub const NOT_SPECIFIED: &str = "Not specified";

/// The two record types kept in the document store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Vacancy,
    Resume,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Vacancy => "vacancy",
            RecordKind::Resume => "resume",
        }
    }

    /// Name of the persisted vector index holding this kind
    pub fn index_name(&self) -> &'static str {
        match self {
            RecordKind::Vacancy => "db_vacancies",
            RecordKind::Resume => "db_resumes",
        }
    }

    /// The kind a record of this kind is matched against
    pub fn counterpart(&self) -> RecordKind {
        match self {
            RecordKind::Vacancy => RecordKind::Resume,
            RecordKind::Resume => RecordKind::Vacancy,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = HrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "vacancy" => Ok(RecordKind::Vacancy),
            "resume" => Ok(RecordKind::Resume),
            other => Err(HrError::Storage(format!("Unknown document type: {}", other))),
        }
    }
}

impl From<RecordKind> for ChunkKind {
    fn from(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Vacancy => ChunkKind::Vacancy,
            RecordKind::Resume => ChunkKind::Resume,
        }
    }
}

/// Common behaviour of persisted records
pub trait Record: Serialize + DeserializeOwned {
    const KIND: RecordKind;

    fn id(&self) -> &str;

    /// Replace the identifier (used when a stored file lacks one)
    fn set_id(&mut self, id: &str);

    fn position(&self) -> &str;

    /// Raw text the record was extracted from
    fn source_text(&self) -> &str;

    /// Templated summary embedded into the vector index
    fn summary(&self) -> String;

    /// Assemble a record from extracted fields plus id and raw text
    fn from_fields(id: &str, source_text: &str, fields: &FieldMap) -> Self;

    fn to_chunk(&self) -> Chunk {
        Chunk::new(self.summary(), self.id(), Self::KIND.into())
    }
}

/// Structured vacancy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VacancyRecord {
    pub id: String,
    pub position: String,
    pub company: String,
    pub skills: String,
    pub requirements: String,
    pub responsibilities: String,
    /// Raw vacancy text
    pub vacancy: String,
}

/// Structured resume
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeRecord {
    pub id: String,
    pub position: String,
    pub skills: String,
    pub experience: String,
    /// Raw resume text
    pub resume: String,
}

/// Empty string when the model reported the field as absent
fn clean(value: Option<&String>) -> String {
    match value.map(|v| v.trim()) {
        Some(v) if !is_missing(v) => v.to_string(),
        _ => String::new(),
    }
}

fn is_missing(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("none") || value.eq_ignore_ascii_case("null")
}

/// `value`, or [`NOT_SPECIFIED`] when it is empty
pub fn or_not_specified(value: &str) -> &str {
    if is_missing(value.trim()) { NOT_SPECIFIED } else { value }
}

impl Record for VacancyRecord {
    const KIND: RecordKind = RecordKind::Vacancy;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    fn position(&self) -> &str {
        &self.position
    }

    fn source_text(&self) -> &str {
        &self.vacancy
    }

    fn summary(&self) -> String {
        format!(
            "1.Position: {}. 2.Skills: {}. 3.Requirements: {}. 4.Responsibilities: {}",
            self.position, self.skills, self.requirements, self.responsibilities
        )
    }

    fn from_fields(id: &str, source_text: &str, fields: &FieldMap) -> Self {
        Self {
            id: id.to_string(),
            position: clean(fields.get("position")),
            company: clean(fields.get("company")),
            skills: clean(fields.get("skills")),
            requirements: clean(fields.get("requirements")),
            responsibilities: clean(fields.get("responsibilities")),
            vacancy: source_text.to_string(),
        }
    }
}

impl Record for ResumeRecord {
    const KIND: RecordKind = RecordKind::Resume;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    fn position(&self) -> &str {
        &self.position
    }

    fn source_text(&self) -> &str {
        &self.resume
    }

    fn summary(&self) -> String {
        format!(
            "1.Position: {}. 2.Skills: {}. 3.Experience: {}",
            self.position, self.skills, self.experience
        )
    }

    fn from_fields(id: &str, source_text: &str, fields: &FieldMap) -> Self {
        Self {
            id: id.to_string(),
            position: clean(fields.get("position")),
            skills: clean(fields.get("skills")),
            experience: clean(fields.get("experience")),
            resume: source_text.to_string(),
        }
    }
}
