//! Candidate assessment after the interview

use crate::error::Result;
use crate::llm::prompts::{self, fill};
use crate::llm::{ChatModel, ChatRequest};
use crate::utils::{file_timestamp, sanitize_filename};
use chrono::Local;
use std::path::{Path, PathBuf};

/// Generates key requirements and the final assessment
pub struct Assessor<'a, M: ChatModel> {
    chat: &'a M,
    model: String,
    temperature: f32,
}

/// Context of the report header
#[derive(Debug, Clone)]
pub struct ReportHeader<'h> {
    pub position: &'h str,
    pub company: &'h str,
    pub resume_id: &'h str,
    pub source: &'h str,
}

impl<'a, M: ChatModel> Assessor<'a, M> {
    pub fn new(chat: &'a M, model: &str, temperature: f32) -> Self {
        Self {
            chat,
            model: model.to_string(),
            temperature,
        }
    }

    pub async fn key_requirements(&self, vacancy_text: &str, position: &str) -> Result<String> {
        let request = ChatRequest::new(
            &self.model,
            prompts::KEY_REQUIREMENTS_SYSTEM,
            fill(prompts::KEY_REQUIREMENTS_USER, &[("position", position), ("vacancy", vacancy_text)]),
        )
        .temperature(self.temperature);

        let requirements = self.chat.complete(&request).await?;
        log::info!("Key requirements defined for '{}'", position);
        Ok(requirements)
    }

    pub async fn final_assessment(
        &self,
        transcript: &str,
        vacancy_text: &str,
        key_requirements: &str,
        position: &str,
        company: &str,
    ) -> Result<String> {
        let request = ChatRequest::new(
            &self.model,
            fill(prompts::ASSESSMENT_SYSTEM, &[("company", company)]),
            fill(
                prompts::ASSESSMENT_USER,
                &[
                    ("position", position),
                    ("company", company),
                    ("requirements", key_requirements),
                    ("vacancy", vacancy_text),
                    ("transcript", transcript),
                ],
            ),
        )
        .temperature(self.temperature);

        let assessment = self.chat.complete(&request).await?;
        log::info!("Final assessment generated");
        Ok(assessment)
    }
}

/// Write `assessment_{resume_id}_{YYYYMMDD_HHMMSS}.txt` under `data_dir`
pub fn save_report(assessment: &str, header: &ReportHeader<'_>, data_dir: &Path) -> Result<PathBuf> {
    let file_name = format!(
        "assessment_{}_{}.txt",
        sanitize_filename(header.resume_id),
        file_timestamp()
    );
    let path = data_dir.join(file_name);

    let content = format!(
        "CANDIDATE ASSESSMENT\n\
         Position: {}\n\
         Company: {}\n\
         Candidate ID: {}\n\
         Source: {}\n\
         Date: {}\n\
         {}\n\n\
         {}\n",
        header.position,
        header.company,
        header.resume_id,
        header.source,
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60),
        assessment.trim()
    );
    std::fs::write(&path, content)?;

    log::info!("Assessment saved to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HrError;
    use tempfile::tempdir;

    struct EchoChat;

    impl ChatModel for EchoChat {
        async fn complete(&self, request: &ChatRequest) -> Result<String> {
            if request.user.contains("FAIL") {
                return Err(HrError::Llm("boom".to_string()));
            }
            Ok(format!("[{}] {}", request.model, request.system))
        }
    }

    #[tokio::test]
    async fn test_assessor_calls() {
        let assessor = Assessor::new(&EchoChat, "gpt-4o", 0.1);
        let requirements = assessor.key_requirements("Vacancy", "QA").await.unwrap();
        assert!(requirements.starts_with("[gpt-4o]"));

        let assessment = assessor
            .final_assessment("transcript", "vacancy", &requirements, "QA", "Acme")
            .await
            .unwrap();
        assert!(assessment.contains("Acme"));

        assert!(assessor.key_requirements("FAIL", "QA").await.is_err());
    }

    #[test]
    fn test_save_report() {
        let dir = tempdir().unwrap();
        let header = ReportHeader {
            position: "QA engineer",
            company: "Acme",
            resume_id: "ivanov",
            source: "Local database",
        };

        let path = save_report("Strong candidate.", &header, dir.path()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("assessment_ivanov_"));
        assert!(name.ends_with(".txt"));
        assert_eq!(name.len(), "assessment_ivanov_".len() + 15 + ".txt".len());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Position: QA engineer"));
        assert!(content.contains("Candidate ID: ivanov"));
        assert!(content.trim_end().ends_with("Strong candidate."));
    }
}
