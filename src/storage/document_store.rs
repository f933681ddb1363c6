//! JSON document store for vacancy and resume records
//!
//! One pretty-printed JSON file per record, named by record id, inside a
//! type-specific folder of the data layout.

use crate::error::{HrError, Result};
use crate::storage::records::{Record, RecordKind, ResumeRecord, VacancyRecord};
use crate::text::Chunk;
use crate::utils::{document_id_from_file_name, ensure_directory, list_files_with_extension};
use std::path::{Path, PathBuf};

/// Folder layout under the data path
#[derive(Debug, Clone)]
pub struct DataLayout {
    pub base: PathBuf,
    pub vacancies_pdf: PathBuf,
    pub vacancies_json: PathBuf,
    pub resumes_pdf: PathBuf,
    pub resumes_json: PathBuf,
    /// Persisted vector indexes
    pub db: PathBuf,
    /// Question bank and knowledge base sources
    pub add_data: PathBuf,
}

impl DataLayout {
    pub fn new<P: AsRef<Path>>(base: P) -> Self {
        let base = base.as_ref().to_path_buf();
        Self {
            vacancies_pdf: base.join("vacancies_pdf"),
            vacancies_json: base.join("vacancies_json"),
            resumes_pdf: base.join("resumes_pdf"),
            resumes_json: base.join("resumes_json"),
            db: base.join("db_faiss"),
            add_data: base.join("add_data"),
            base,
        }
    }

    /// Create every folder of the layout
    pub fn create_directories(&self) -> Result<()> {
        for path in [
            &self.base,
            &self.vacancies_pdf,
            &self.vacancies_json,
            &self.resumes_pdf,
            &self.resumes_json,
            &self.db,
            &self.add_data,
        ] {
            ensure_directory(path)?;
            log::debug!("Directory ready: {}", path.display());
        }
        Ok(())
    }

    pub fn pdf_dir(&self, kind: RecordKind) -> &Path {
        match kind {
            RecordKind::Vacancy => &self.vacancies_pdf,
            RecordKind::Resume => &self.resumes_pdf,
        }
    }

    pub fn json_dir(&self, kind: RecordKind) -> &Path {
        match kind {
            RecordKind::Vacancy => &self.vacancies_json,
            RecordKind::Resume => &self.resumes_json,
        }
    }

    pub fn record_path(&self, kind: RecordKind, id: &str) -> PathBuf {
        self.json_dir(kind).join(format!("{}.json", id))
    }

    /// Flat append-only dialogue log
    pub fn log_file(&self) -> PathBuf {
        self.base.join("log.txt")
    }
}

/// Document store over a [`DataLayout`]
#[derive(Debug, Clone)]
pub struct DocumentStore {
    layout: DataLayout,
}

impl DocumentStore {
    /// Open the store, creating the folder layout when needed
    pub fn new<P: AsRef<Path>>(base: P) -> Result<Self> {
        let layout = DataLayout::new(base);
        layout.create_directories()?;
        log::info!("Document store ready at {}", layout.base.display());
        Ok(Self { layout })
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    /// Save a typed record, overwriting any record with the same id
    pub fn save<R: Record>(&self, record: &R) -> bool {
        match serde_json::to_value(record) {
            Ok(value) => self.save_json(R::KIND.as_str(), record.id(), &value),
            Err(e) => {
                log::error!("Failed to serialize {} {}: {}", R::KIND, record.id(), e);
                false
            }
        }
    }

    /// Save a JSON value under a document type name (`"vacancy"` or `"resume"`)
    pub fn save_json(&self, doc_type: &str, id: &str, value: &serde_json::Value) -> bool {
        let kind = match doc_type.parse::<RecordKind>() {
            Ok(kind) => kind,
            Err(e) => {
                log::error!("{}", e);
                return false;
            }
        };

        match self.write_json(kind, id, value) {
            Ok(()) => {
                log::info!("Saved {} with ID {}", kind, id);
                true
            }
            Err(e) => {
                log::error!("Failed to save {} {}: {}", kind, id, e);
                false
            }
        }
    }

    fn write_json(&self, kind: RecordKind, id: &str, value: &serde_json::Value) -> Result<()> {
        if id.trim().is_empty() {
            return Err(HrError::Storage("Record id must not be empty".to_string()));
        }
        let data = serde_json::to_string_pretty(value)?;
        std::fs::write(self.layout.record_path(kind, id), data)?;
        Ok(())
    }

    /// Load a record by id; `None` when missing or undecodable
    pub fn load<R: Record>(&self, id: &str) -> Option<R> {
        let path = self.layout.record_path(R::KIND, id);
        if !path.exists() {
            log::warn!("File {} does not exist", path.display());
            return None;
        }

        match Self::read_record::<R>(&path) {
            Ok(mut record) => {
                if record.id().is_empty() {
                    record.set_id(id);
                }
                log::info!("Loaded {} with ID {}", R::KIND, id);
                Some(record)
            }
            Err(e) => {
                log::error!("Failed to load {} {}: {}", R::KIND, id, e);
                None
            }
        }
    }

    fn read_record<R: Record>(path: &Path) -> Result<R> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Identifiers of all stored records of `kind`, sorted
    pub fn list_ids(&self, kind: RecordKind) -> Vec<String> {
        match list_files_with_extension(self.layout.json_dir(kind), "json") {
            Ok(files) => files
                .iter()
                .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
                .map(document_id_from_file_name)
                .collect(),
            Err(e) => {
                log::error!("Failed to list {} documents: {}", kind, e);
                Vec::new()
            }
        }
    }

    /// Index chunk of a stored record; `None` when the record cannot be loaded
    pub fn record_to_chunk(&self, kind: RecordKind, id: &str) -> Option<Chunk> {
        match kind {
            RecordKind::Vacancy => self.load::<VacancyRecord>(id).map(|r| r.to_chunk()),
            RecordKind::Resume => self.load::<ResumeRecord>(id).map(|r| r.to_chunk()),
        }
    }

    /// Chunks for every stored record of `kind`
    pub fn chunks(&self, kind: RecordKind) -> Vec<Chunk> {
        self.list_ids(kind)
            .iter()
            .filter_map(|id| self.record_to_chunk(kind, id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::ChunkKind;
    use tempfile::TempDir;

    fn store() -> (TempDir, DocumentStore) {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path().join("data")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_layout_is_created() {
        let (_dir, store) = store();
        let layout = store.layout();
        for path in [
            &layout.vacancies_pdf,
            &layout.vacancies_json,
            &layout.resumes_pdf,
            &layout.resumes_json,
            &layout.db,
            &layout.add_data,
        ] {
            assert!(path.is_dir(), "missing {}", path.display());
        }
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let (_dir, store) = store();
        let vacancy = VacancyRecord {
            id: "python_dev".into(),
            position: "Python developer".into(),
            company: "Acme".into(),
            skills: "Python, Django".into(),
            requirements: "3+ years".into(),
            responsibilities: "Backend services".into(),
            vacancy: "Full vacancy text".into(),
        };

        assert!(store.save(&vacancy));
        let loaded: VacancyRecord = store.load("python_dev").unwrap();
        assert_eq!(loaded, vacancy);
    }

    #[test]
    fn test_save_overwrites_by_id() {
        let (_dir, store) = store();
        let mut resume = ResumeRecord {
            id: "r1".into(),
            position: "Junior".into(),
            ..Default::default()
        };
        assert!(store.save(&resume));
        resume.position = "Senior".into();
        assert!(store.save(&resume));

        let loaded: ResumeRecord = store.load("r1").unwrap();
        assert_eq!(loaded.position, "Senior");
        assert_eq!(store.list_ids(RecordKind::Resume), vec!["r1"]);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let (_dir, store) = store();
        let value = serde_json::json!({"id": "x"});
        assert!(!store.save_json("cover_letter", "x", &value));
        assert!(store.save_json("resume", "x", &value));
    }

    #[test]
    fn test_missing_and_corrupt_records_load_as_none() {
        let (_dir, store) = store();
        assert!(store.load::<VacancyRecord>("absent").is_none());

        let path = store.layout().record_path(RecordKind::Vacancy, "broken");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(store.load::<VacancyRecord>("broken").is_none());
        assert!(store.record_to_chunk(RecordKind::Vacancy, "broken").is_none());
    }

    #[test]
    fn test_partial_record_is_loadable_and_chunkable() {
        let (_dir, store) = store();
        let path = store.layout().record_path(RecordKind::Resume, "partial");
        std::fs::write(&path, r#"{"skills": "Rust"}"#).unwrap();

        let resume: ResumeRecord = store.load("partial").unwrap();
        assert_eq!(resume.id, "partial");
        assert_eq!(resume.position, "");

        let chunk = store.record_to_chunk(RecordKind::Resume, "partial").unwrap();
        assert_eq!(chunk.text, "1.Position: . 2.Skills: Rust. 3.Experience: ");
        assert_eq!(chunk.kind, ChunkKind::Resume);
        assert_eq!(chunk.reference, "partial");
    }

    #[test]
    fn test_list_ids_filters_extension() {
        let (_dir, store) = store();
        let dir = store.layout().json_dir(RecordKind::Vacancy).to_path_buf();
        std::fs::write(dir.join("b.json"), "{}").unwrap();
        std::fs::write(dir.join("a.json"), "{}").unwrap();
        std::fs::write(dir.join("readme.txt"), "").unwrap();

        assert_eq!(store.list_ids(RecordKind::Vacancy), vec!["a", "b"]);
        assert_eq!(store.chunks(RecordKind::Vacancy).len(), 2);
        assert!(store.list_ids(RecordKind::Resume).is_empty());
    }
}
