//! Interview flow
//!
//! Console and speech seams, the question bank, the dialogue runner and the
//! assessment that follows it.

pub mod assessment;
pub mod console;
pub mod presentation;
pub mod questions;
pub mod runner;

pub use assessment::{Assessor, ReportHeader, save_report};
pub use console::{Console, StdConsole};
pub use presentation::{company_description, default_hr_answers, load_knowledge_base};
pub use questions::{QuestionBank, default_question_bank, select_questions};
pub use runner::{Exchange, InterviewPlan, InterviewSettings, InterviewTranscript, Interviewer};
