//! Interview session: runner, assessment and report for one candidate

use crate::api::HrSystem;
use crate::error::{HrError, Result};
use crate::interview::questions::load_or_create;
use crate::interview::{
    Assessor, Console, InterviewPlan, InterviewSettings, Interviewer, ReportHeader, company_description,
    load_knowledge_base, save_report, select_questions,
};
use crate::llm::ChatModel;
use crate::ml::Embedder;
use crate::speech::Speaker;
use crate::storage::{ResumeRecord, VacancyRecord};
use crate::utils::append_log_entry;
use std::path::{Path, PathBuf};

/// Question bank file inside `add_data/`
pub const QUESTIONS_FILE: &str = "general_questions.json";

/// Source named in assessment reports
const REPORT_SOURCE: &str = "Local database";

/// Append to `log.txt`; a failed write never stops the session
fn log_dialogue(log_file: &Path, title: &str, text: &str) {
    if let Err(e) = append_log_entry(log_file, title, text) {
        log::error!("Failed to write '{}' to {}: {}", title, log_file.display(), e);
    }
}

impl<M, E, S> HrSystem<M, E, S>
where
    M: ChatModel,
    E: Embedder,
    S: Speaker,
{
    /// Interview the candidate `resume_id` for `vacancy_id` and save the
    /// assessment report; `None` when the session cannot start or the report
    /// cannot be written
    pub async fn conduct_interview<C: Console>(
        &self,
        resume_id: &str,
        vacancy_id: &str,
        console: &mut C,
    ) -> Option<PathBuf> {
        match self.try_conduct_interview(resume_id, vacancy_id, console).await {
            Ok(path) => Some(path),
            Err(e) => {
                let message = format!("Error while conducting the interview: {}", e);
                log::error!("{}", message);
                console.say(&message);
                None
            }
        }
    }

    async fn try_conduct_interview<C: Console>(
        &self,
        resume_id: &str,
        vacancy_id: &str,
        console: &mut C,
    ) -> Result<PathBuf> {
        let resume: ResumeRecord = self.store.load(resume_id).ok_or_else(|| {
            HrError::Interview(format!("Failed to load resume {}", resume_id))
        })?;
        let vacancy: VacancyRecord = self.store.load(vacancy_id).ok_or_else(|| {
            HrError::Interview(format!("Failed to load vacancy {}", vacancy_id))
        })?;

        let position = if vacancy.position.trim().is_empty() { "Specialist" } else { vacancy.position.as_str() };
        let company = if vacancy.company.trim().is_empty() { "our company" } else { vacancy.company.as_str() };
        let layout = self.store.layout();

        let bank = load_or_create(&layout.add_data.join(QUESTIONS_FILE));
        let questions = select_questions(position, &bank);
        let knowledge = load_knowledge_base(&self.embedder, layout, &vacancy).await;
        let description = company_description(&vacancy);

        console.say(&format!("=== Interview for the position {} ===", position));

        let settings = InterviewSettings::from_config(&self.config);
        let width = settings.wrap_width;
        let plan = InterviewPlan {
            position,
            resume_text: &resume.resume,
            vacancy_text: &vacancy.vacancy,
            base_questions: &questions,
            company_description: &description,
        };
        let transcript = Interviewer::new(&self.chat, &self.speaker, console, settings)
            .run(&plan, &self.embedder, knowledge.as_ref())
            .await;
        log::info!("Interview completed with {} answered questions", transcript.answered_questions());

        let full_interview = transcript.render(width);
        let log_file = layout.log_file();
        log_dialogue(&log_file, &format!("Interview for {} ({})", position, resume_id), &full_interview);
        if !transcript.candidate_questions.is_empty() {
            log_dialogue(&log_file, "Candidate questions", &transcript.render_candidate_questions(width));
        }

        console.say("=== Generating the final assessment ===");
        let assessor = Assessor::new(
            &self.chat,
            &self.config.llm.interview_model,
            self.config.llm.analysis_temperature,
        );
        let key_requirements = assessor
            .key_requirements(&vacancy.vacancy, position)
            .await
            .unwrap_or_else(|e| {
                log::error!("Failed to define key requirements: {}", e);
                String::new()
            });
        let assessment = assessor
            .final_assessment(&full_interview, &vacancy.vacancy, &key_requirements, position, company)
            .await
            .unwrap_or_else(|e| {
                log::error!("Failed to generate the assessment: {}", e);
                format!("The assessment could not be generated: {}", e)
            });
        log_dialogue(&log_file, "Assessment", &assessment);

        let header = ReportHeader {
            position,
            company,
            resume_id,
            source: REPORT_SOURCE,
        };
        let path = save_report(&assessment, &header, &layout.base)?;

        console.say("=== Interview finished! ===");
        console.say(&format!("The assessment was saved to: {}", path.display()));
        Ok(path)
    }
}
