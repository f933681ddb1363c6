//! Company presentation and the HR answers knowledge base

use crate::ml::{Embedder, VectorIndex, knowledge_base_from_markdown, knowledge_base_from_text};
use crate::storage::{DataLayout, VacancyRecord};
use std::path::PathBuf;

/// Index name of the knowledge base
pub const HR_ANSWERS_INDEX: &str = "db_hr_answers";

/// Knowledge base source inside `add_data/`
pub const HR_ANSWERS_FILE: &str = "hr_answers.txt";

fn company_name(vacancy: &VacancyRecord) -> &str {
    if vacancy.company.trim().is_empty() { "our company" } else { &vacancy.company }
}

fn position_name(vacancy: &VacancyRecord) -> &str {
    if vacancy.position.trim().is_empty() { "Specialist" } else { &vacancy.position }
}

/// Text read to the candidate after the questions
pub fn company_description(vacancy: &VacancyRecord) -> String {
    let company = company_name(vacancy);
    let position = position_name(vacancy);
    let skills = if vacancy.skills.trim().is_empty() {
        "Various professional skills depending on the candidate's experience"
    } else {
        &vacancy.skills
    };

    format!(
        "About \"{company}\"

\"{company}\" is one of the leading companies in its industry. We strive for innovation and continuous development, creating high-quality products and services. Our team consists of qualified specialists who value professionalism, creativity and mutual respect.

About the position \"{position}\"

We are looking for a talented specialist for the position \"{position}\".

Required skills:
{skills}

We offer:
- Official employment
- Competitive salary
- Opportunities for professional growth and development
- A friendly team and comfortable working conditions
- A modern office in a convenient location

Join our team and grow with us!"
    )
}

/// Markdown answer sheet generated when no knowledge base is available
pub fn default_hr_answers(vacancy: &VacancyRecord) -> String {
    let company = company_name(vacancy);
    let position = position_name(vacancy);
    let skills = if vacancy.skills.trim().is_empty() {
        "various professional skills depending on the candidate's experience"
    } else {
        &vacancy.skills
    };

    format!(
        "# HR answers to candidate questions

# HR answers for the position: {position}

## About the company
Our company {company} is one of the leaders in its industry. We strive for innovation and continuous development, creating high-quality products and services. Our team consists of qualified specialists who value professionalism, creativity and mutual respect.

## About the position {position}
We are looking for a talented specialist for the position {position}. Required skills: {skills}.

## Hiring process
The hiring process includes an initial interview with HR, a technical interview and a final meeting with the manager. After all stages are passed successfully we make a job offer.

## Salary and benefits
We offer a competitive salary, official employment, health insurance, corporate training and other employee benefits.
"
    )
}

/// Index `add_data/hr_answers.txt`. A missing file is replaced by the generated
/// answer sheet; an existing file that cannot be indexed is left untouched and
/// the generated sheet is indexed instead.
pub async fn load_knowledge_base<E: Embedder>(
    embedder: &E,
    layout: &DataLayout,
    vacancy: &VacancyRecord,
) -> Option<VectorIndex> {
    let path: PathBuf = layout.add_data.join(HR_ANSWERS_FILE);

    if path.exists() {
        if let Some(index) = knowledge_base_from_markdown(embedder, &path, &layout.db, HR_ANSWERS_INDEX).await {
            return Some(index);
        }
        log::warn!("Falling back to the generated HR answer sheet");
        return knowledge_base_from_text(embedder, &default_hr_answers(vacancy), &layout.db, HR_ANSWERS_INDEX)
            .await;
    }

    let sheet = default_hr_answers(vacancy);
    if let Err(e) = std::fs::write(&path, &sheet) {
        log::error!("Failed to write {}: {}", path.display(), e);
        return knowledge_base_from_text(embedder, &sheet, &layout.db, HR_ANSWERS_INDEX).await;
    }
    log::info!("Default HR answer sheet written to {}", path.display());
    knowledge_base_from_markdown(embedder, &path, &layout.db, HR_ANSWERS_INDEX).await
}
