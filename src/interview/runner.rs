//! Interview dialogue
//!
//! Stages run in a fixed order: greeting, base questions, follow-up
//! generation, follow-up questions, presentation, open Q&A. Only the Q&A loop
//! branches. A failing step is logged and the interview continues.

use crate::config::{Config, InterviewConfig};
use crate::error::Result;
use crate::interview::console::Console;
use crate::interview::questions::{parse_numbered_questions, strip_question_number};
use crate::llm::prompts::{self, fill};
use crate::llm::{ChatModel, ChatRequest};
use crate::ml::{Embedder, VectorIndex};
use crate::speech::Speaker;
use crate::utils::format_text;

const RECRUITER: &str = "Recruiter: ";
const CANDIDATE: &str = "Candidate: ";

/// One question and the candidate's answer
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
}

/// Everything said during an interview
#[derive(Debug, Clone, Default)]
pub struct InterviewTranscript {
    pub resume: String,
    pub base: Vec<Exchange>,
    pub follow_up: Vec<Exchange>,
    /// Candidate questions and the recruiter's answers
    pub candidate_questions: Vec<Exchange>,
}

fn render_exchanges(exchanges: &[Exchange], width: usize) -> Vec<String> {
    exchanges
        .iter()
        .map(|e| {
            format!(
                "{}\n\n{}\n\n",
                e.question,
                format_text(&format!("{}{}", CANDIDATE, e.answer), width)
            )
        })
        .collect()
}

impl InterviewTranscript {
    /// Resume plus base exchanges; the input for follow-up generation
    pub fn summary(&self, width: usize) -> String {
        let mut parts = vec![format!("Resume:\n{}\n", self.resume), "Interview:\n".to_string()];
        parts.extend(render_exchanges(&self.base, width));
        parts.join("\n")
    }

    /// Summary plus follow-up exchanges; the input for the assessment
    pub fn render(&self, width: usize) -> String {
        format!(
            "{}\n\nAdditional questions and answers:\n\n{}",
            self.summary(width),
            render_exchanges(&self.follow_up, width).join("\n")
        )
    }

    /// Candidate Q&A in display form
    pub fn render_candidate_questions(&self, width: usize) -> String {
        self.candidate_questions
            .iter()
            .map(|e| {
                format!(
                    "{}\n\n{}\n",
                    format_text(&format!("{}{}", CANDIDATE, e.question), width),
                    format_text(&format!("{}{}", RECRUITER, e.answer), width)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn answered_questions(&self) -> usize {
        self.base.len() + self.follow_up.len()
    }
}

/// Models and limits used by the interviewer
#[derive(Debug, Clone)]
pub struct InterviewSettings {
    /// Model for follow-up generation and Q&A answers
    pub model: String,
    pub analysis_temperature: f32,
    pub answer_temperature: f32,
    pub exit_phrase: String,
    pub wrap_width: usize,
    pub knowledge_top_k: usize,
}

impl InterviewSettings {
    pub fn from_config(config: &Config) -> Self {
        let InterviewConfig {
            exit_phrase,
            wrap_width,
            knowledge_top_k,
        } = config.interview.clone();
        Self {
            model: config.llm.interview_model.clone(),
            analysis_temperature: config.llm.analysis_temperature,
            answer_temperature: config.llm.answer_temperature,
            exit_phrase,
            wrap_width,
            knowledge_top_k,
        }
    }
}

impl Default for InterviewSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Material the interview is about
pub struct InterviewPlan<'p> {
    pub position: &'p str,
    pub resume_text: &'p str,
    pub vacancy_text: &'p str,
    pub base_questions: &'p [String],
    pub company_description: &'p str,
}

/// Drives the dialogue over a console with optional speech
pub struct Interviewer<'a, M, S, C> {
    chat: &'a M,
    speaker: &'a S,
    console: &'a mut C,
    settings: InterviewSettings,
}

impl<'a, M, S, C> Interviewer<'a, M, S, C>
where
    M: ChatModel,
    S: Speaker,
    C: Console,
{
    pub fn new(chat: &'a M, speaker: &'a S, console: &'a mut C, settings: InterviewSettings) -> Self {
        Self {
            chat,
            speaker,
            console,
            settings,
        }
    }

    fn wrap(&self, text: &str) -> String {
        format_text(text, self.settings.wrap_width)
    }

    async fn speak(&self, text: &str) {
        if let Err(e) = self.speaker.speak(text).await {
            log::warn!("Speech synthesis failed: {}", e);
        }
    }

    async fn recruiter_says(&mut self, spoken: &str, shown: &str) {
        self.speak(spoken).await;
        let line = self.wrap(&format!("{}{}", RECRUITER, shown));
        self.console.say(&line);
    }

    /// Full interview from greeting to the end of the Q&A loop
    pub async fn run<E: Embedder>(
        &mut self,
        plan: &InterviewPlan<'_>,
        embedder: &E,
        knowledge: Option<&VectorIndex>,
    ) -> InterviewTranscript {
        let mut transcript = InterviewTranscript {
            resume: plan.resume_text.to_string(),
            ..Default::default()
        };

        self.greet().await;
        transcript.base = self.ask_questions(plan.base_questions).await;
        log::info!("Base interview finished");

        let summary = transcript.summary(self.settings.wrap_width);
        let follow_ups = self
            .generate_follow_ups(&summary, plan.vacancy_text, plan.position)
            .await;
        transcript.follow_up = self.ask_questions(&follow_ups).await;
        log::info!("Asked {} additional questions", transcript.follow_up.len());

        self.present(plan.company_description);
        transcript.candidate_questions = self
            .answer_candidate_questions(embedder, knowledge, plan.position)
            .await;

        transcript
    }

    pub async fn greet(&mut self) {
        self.recruiter_says(prompts::GREETING, prompts::GREETING).await;
    }

    /// Ask each question in turn; a question whose answer cannot be read is skipped
    pub async fn ask_questions(&mut self, questions: &[String]) -> Vec<Exchange> {
        let mut exchanges = Vec::new();

        for question in questions {
            self.recruiter_says(&strip_question_number(question), question).await;

            match self.console.ask(CANDIDATE) {
                Ok(answer) => exchanges.push(Exchange {
                    question: question.clone(),
                    answer: answer.trim().to_string(),
                }),
                Err(e) => {
                    let message = format!("Error while processing the question: {}", e);
                    log::error!("{}", message);
                    self.console.say(&message);
                }
            }
        }

        log::info!("Asked {} questions, received {} answers", questions.len(), exchanges.len());
        exchanges
    }

    /// Follow-up questions for the interview so far; empty on failure
    pub async fn generate_follow_ups(&self, summary: &str, vacancy_text: &str, position: &str) -> Vec<String> {
        match self.try_generate_follow_ups(summary, vacancy_text, position).await {
            Ok(questions) => questions,
            Err(e) => {
                log::error!("Failed to generate additional questions: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_generate_follow_ups(&self, summary: &str, vacancy_text: &str, position: &str) -> Result<Vec<String>> {
        let request = ChatRequest::new(
            &self.settings.model,
            fill(prompts::FOLLOW_UP_SYSTEM, &[("position", position)]),
            fill(
                prompts::FOLLOW_UP_USER,
                &[("position", position), ("summary", summary), ("vacancy", vacancy_text)],
            ),
        )
        .temperature(self.settings.analysis_temperature);

        let response = self.chat.complete(&request).await?;
        Ok(parse_numbered_questions(&response))
    }

    /// Show the company presentation once the operator presses Enter
    pub fn present(&mut self, company_description: &str) {
        let intro = self.wrap(&format!("{}{}", RECRUITER, prompts::PRESENTATION_INTRO));
        self.console.say(&intro);
        if let Err(e) = self.console.ask("") {
            log::warn!("No acknowledgment before presentation: {}", e);
        }
        let description = self.wrap(company_description);
        self.console.say(&description);
        log::info!("Company and vacancy presented");
    }

    /// Answer candidate questions until the exit phrase is typed or input ends
    pub async fn answer_candidate_questions<E: Embedder>(
        &mut self,
        embedder: &E,
        knowledge: Option<&VectorIndex>,
        position: &str,
    ) -> Vec<Exchange> {
        let intro = fill(prompts::QA_INTRO, &[("exit_phrase", &self.settings.exit_phrase)]);
        let intro = self.wrap(&format!("{}{}", RECRUITER, intro));
        self.console.say(&intro);

        let exit_phrase = self.settings.exit_phrase.trim().to_lowercase();
        let mut exchanges = Vec::new();

        loop {
            let question = match self.console.ask(CANDIDATE) {
                Ok(question) => question,
                Err(e) => {
                    log::warn!("Candidate input ended: {}", e);
                    break;
                }
            };

            if question.trim().to_lowercase() == exit_phrase {
                let farewell = format!("{}{}", RECRUITER, prompts::QA_FAREWELL);
                self.console.say(&farewell);
                break;
            }
            if question.trim().is_empty() {
                continue;
            }

            let answer = match self.answer_question(embedder, knowledge, position, &question).await {
                Ok(answer) => {
                    self.recruiter_says(&answer, &answer).await;
                    answer
                }
                Err(e) => {
                    log::error!("Error while processing the question: {}", e);
                    let apology = format!("{}{}", RECRUITER, prompts::QA_APOLOGY);
                    self.console.say(&apology);
                    prompts::QA_APOLOGY.to_string()
                }
            };
            exchanges.push(Exchange { question, answer });
        }

        log::info!("Candidate questions stage finished");
        exchanges
    }

    /// Knowledge-base grounded answer to one candidate question
    pub async fn answer_question<E: Embedder>(
        &self,
        embedder: &E,
        knowledge: Option<&VectorIndex>,
        position: &str,
        question: &str,
    ) -> Result<String> {
        let query = fill(prompts::QA_QUERY, &[("position", position), ("question", question)]);
        let context = match knowledge {
            Some(index) => index
                .search_chunks(embedder, &query, self.settings.knowledge_top_k)
                .await?
                .iter()
                .enumerate()
                .map(|(i, (_, chunk))| format!("\nChunk {}:\n{}\n", i + 1, chunk.text))
                .collect::<Vec<_>>()
                .join("\n ")
                .replace("\n\n", " "),
            None => String::new(),
        };

        let user = format!(
            "# Knowledge base for answers: \n{} \n# {}",
            context,
            fill(prompts::QA_USER, &[("position", position), ("question", question)])
        );
        let request = ChatRequest::new(
            &self.settings.model,
            fill(prompts::QA_SYSTEM, &[("position", position)]),
            user,
        )
        .temperature(self.settings.answer_temperature);

        self.chat.complete(&request).await
    }
}
