//! Shared fixtures for integration tests

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use neurohr::error::{HrError, Result};
use neurohr::{ChatModel, ChatRequest, Config, Console, HashEmbedder, HrSystem, SilentSpeaker};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

/// Chat model answering by the first rule whose key occurs in the user prompt
pub struct KeywordChat {
    rules: Vec<(String, String)>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl KeywordChat {
    pub fn new(rules: &[(&str, &str)]) -> Self {
        Self {
            rules: rules
                .iter()
                .map(|(key, reply)| (key.to_string(), reply.to_string()))
                .collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl ChatModel for KeywordChat {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.rules
            .iter()
            .find(|(key, _)| request.user.contains(key.as_str()))
            .map(|(_, reply)| reply.clone())
            .ok_or_else(|| HrError::Llm("no scripted reply".to_string()))
    }
}

/// Console fed from a fixed list of answers; records everything shown
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    pub fn shown(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }
}

impl Console for ScriptedConsole {
    fn say(&mut self, text: &str) {
        self.transcript.push(text.to_string());
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        let answer = self
            .answers
            .pop_front()
            .ok_or_else(|| HrError::Interview("No scripted answers left".to_string()))?;
        self.transcript.push(format!("{}{}", prompt, answer));
        Ok(answer)
    }
}

pub const PYTHON_VACANCY: &str = "Python developer wanted at Pythonista Labs. \
    Skills: Python, Django, PostgreSQL, REST API. Requirements: three years of backend development. \
    Responsibilities: design and build web services.";

pub const SALES_VACANCY: &str = "Head of sales wanted at Retail Group. \
    Skills: negotiations, CRM, B2B sales, team management. Requirements: five years in retail sales. \
    Responsibilities: grow revenue and lead the sales team.";

pub const PYTHON_RESUME: &str = "Ivan Petrov. Python developer. Experience building REST API services \
    with Django and PostgreSQL for four years.";

/// Extraction replies keyed by a phrase unique to each document
pub fn extraction_rules() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "Pythonista Labs",
            r#"```json
{"position": "Python developer", "company": "Pythonista Labs", "skills": ["Python", "Django", "PostgreSQL", "REST API"], "requirements": "three years of backend development", "responsibilities": "design and build web services"}
```"#,
        ),
        (
            "Retail Group",
            r#"{"position": "Head of sales", "company": "Retail Group", "skills": "negotiations, CRM, B2B sales, team management", "requirements": "five years in retail sales", "responsibilities": "grow revenue and lead the sales team"}"#,
        ),
        (
            "Ivan Petrov",
            r#"{"position": "Python developer", "skills": "Python, Django, PostgreSQL, REST API", "experience": "four years building REST API services"}"#,
        ),
    ]
}

pub type TestSystem = HrSystem<KeywordChat, HashEmbedder, SilentSpeaker>;

/// System over a fresh temporary data directory
pub fn test_system(chat: KeywordChat) -> (TempDir, TestSystem) {
    let dir = TempDir::new().unwrap();
    let config = Config::default().with_data_path(dir.path().join("data"));
    let system = HrSystem::new(config, chat, HashEmbedder::new(256), SilentSpeaker).unwrap();
    (dir, system)
}

/// Write a one-page PDF with one text line per entry of `lines`
pub fn write_pdf(path: &Path, lines: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 10.into()]),
        Operation::new("TL", vec![14.into()]),
        Operation::new("Td", vec![40.into(), 800.into()]),
    ];
    for line in lines {
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        operations.push(Operation::new("T*", vec![]));
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// Split a document into short lines that fit on a PDF page
pub fn pdf_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + word.len() + 1 > 80 {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
