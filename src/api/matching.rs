//! Matching resumes to vacancies and back

use crate::api::HrSystem;
use crate::error::{HrError, Result};
use crate::llm::ChatModel;
use crate::ml::{Embedder, VectorIndex};
use crate::speech::Speaker;
use crate::storage::{Record, RecordKind, ResumeRecord, VacancyRecord, or_not_specified};

/// One ranked match
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// 1-based rank
    pub rank: usize,
    /// Identifier of the matched record
    pub id: String,
    /// Squared L2 distance, lower is closer
    pub score: f32,
    pub position_title: String,
    /// Skills of a matched resume
    pub skills: Option<String>,
    /// Company of a matched vacancy
    pub company: Option<String>,
}

impl<M, E, S> HrSystem<M, E, S>
where
    M: ChatModel,
    E: Embedder,
    S: Speaker,
{
    fn load_index(&self, kind: RecordKind) -> Result<VectorIndex> {
        VectorIndex::load(&self.embedder, &self.store.layout().db, kind.index_name())
            .ok_or_else(|| HrError::Index(format!("Failed to load the {} index", kind)))
    }

    /// Up to `k` stored resumes closest to the vacancy `vacancy_id`; empty on failure
    pub async fn search_resumes_for_vacancy(&self, vacancy_id: &str, k: usize) -> Vec<MatchResult> {
        match self.try_search_resumes(vacancy_id, k).await {
            Ok(results) => results,
            Err(e) => {
                let message = format!("Error while searching resumes for vacancy {}: {}", vacancy_id, e);
                log::error!("{}", message);
                println!("{}", message);
                Vec::new()
            }
        }
    }

    async fn try_search_resumes(&self, vacancy_id: &str, k: usize) -> Result<Vec<MatchResult>> {
        let vacancy: VacancyRecord = self
            .store
            .load(vacancy_id)
            .ok_or_else(|| HrError::Storage(format!("Vacancy with ID {} not found", vacancy_id)))?;
        let index = self.load_index(RecordKind::Resume)?;

        let hits = index.similarity_search(&self.embedder, vacancy.source_text(), k).await;
        Ok(hits
            .into_iter()
            .enumerate()
            .map(|(i, (score, resume_id))| {
                let resume: ResumeRecord = self.store.load(&resume_id).unwrap_or_default();
                MatchResult {
                    rank: i + 1,
                    score,
                    position_title: or_not_specified(&resume.position).to_string(),
                    skills: Some(or_not_specified(&resume.skills).to_string()),
                    company: None,
                    id: resume_id,
                }
            })
            .collect())
    }

    /// Up to `k` stored vacancies closest to the resume `resume_id`; empty on failure
    pub async fn search_vacancies_for_resume(&self, resume_id: &str, k: usize) -> Vec<MatchResult> {
        match self.try_search_vacancies(resume_id, k).await {
            Ok(results) => results,
            Err(e) => {
                let message = format!("Error while searching vacancies for resume {}: {}", resume_id, e);
                log::error!("{}", message);
                println!("{}", message);
                Vec::new()
            }
        }
    }

    async fn try_search_vacancies(&self, resume_id: &str, k: usize) -> Result<Vec<MatchResult>> {
        let resume: ResumeRecord = self
            .store
            .load(resume_id)
            .ok_or_else(|| HrError::Storage(format!("Resume with ID {} not found", resume_id)))?;
        let index = self.load_index(RecordKind::Vacancy)?;

        let hits = index.similarity_search(&self.embedder, resume.source_text(), k).await;
        Ok(hits
            .into_iter()
            .enumerate()
            .map(|(i, (score, vacancy_id))| {
                let vacancy: VacancyRecord = self.store.load(&vacancy_id).unwrap_or_default();
                MatchResult {
                    rank: i + 1,
                    score,
                    position_title: or_not_specified(&vacancy.position).to_string(),
                    skills: None,
                    company: Some(or_not_specified(&vacancy.company).to_string()),
                    id: vacancy_id,
                }
            })
            .collect())
    }
}
