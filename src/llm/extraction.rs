//! Structured field extraction from vacancy and resume text

use crate::error::{HrError, Result};
use crate::llm::prompts::{self, fill};
use crate::llm::{ChatModel, ChatRequest, strip_json_fences};
use crate::storage::{FieldMap, RecordKind};
use serde_json::{Map, Value, json};

/// Target fields for one document type, each with an instruction for the model
#[derive(Debug, Clone, Copy)]
pub struct DocumentSchema {
    pub title: &'static str,
    pub fields: &'static [(&'static str, &'static str)],
}

pub const VACANCY_SCHEMA: DocumentSchema = DocumentSchema {
    title: "Vacancy",
    fields: &[
        ("position", "Find the job title (position) in the vacancy text. Otherwise, answer: None"),
        ("company", "Find the name of the hiring company in the vacancy text. Otherwise, answer: None"),
        ("skills", "Find all skills listed in the vacancy text. Otherwise, answer: None"),
        ("requirements", "Find all requirements listed in the vacancy text. Otherwise, answer: None"),
        (
            "responsibilities",
            "Find all responsibilities listed in the vacancy text. Otherwise, answer: None",
        ),
    ],
};

pub const RESUME_SCHEMA: DocumentSchema = DocumentSchema {
    title: "Resume",
    fields: &[
        ("position", "Find the job title (position) in the resume text. Otherwise, answer: None"),
        ("skills", "Find all skills (tech stack) listed in the resume text. Otherwise, answer: None"),
        (
            "experience",
            "Find the description of past work experience with activities in the resume text. Otherwise, answer: None",
        ),
    ],
};

impl DocumentSchema {
    pub fn for_kind(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Vacancy => VACANCY_SCHEMA,
            RecordKind::Resume => RESUME_SCHEMA,
        }
    }

    /// JSON schema of the expected object
    pub fn json_schema(&self) -> Value {
        let mut properties = Map::new();
        for (name, description) in self.fields {
            let mut title = name.to_string();
            if let Some(first) = title.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            properties.insert(
                name.to_string(),
                json!({"title": title, "description": description, "type": "string"}),
            );
        }
        let required: Vec<&str> = self.fields.iter().map(|(name, _)| *name).collect();
        json!({"title": self.title, "type": "object", "properties": properties, "required": required})
    }

    pub fn format_instructions(&self) -> String {
        fill(prompts::FORMAT_INSTRUCTIONS, &[("schema", &self.json_schema().to_string())])
    }
}

fn flatten_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => {
            let s = s.trim();
            if s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("null") {
                String::new()
            } else {
                s.to_string()
            }
        }
        Value::Array(items) => items
            .iter()
            .map(flatten_value)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => value.to_string(),
    }
}

/// Parse a model response into a flat field map
pub fn parse_fields(response: &str) -> Result<FieldMap> {
    let value: Value = serde_json::from_str(strip_json_fences(response))?;
    let Value::Object(object) = value else {
        return Err(HrError::Extraction("Response is not a JSON object".to_string()));
    };

    Ok(object
        .iter()
        .map(|(key, value)| (key.clone(), flatten_value(value)))
        .collect())
}

/// Sends document text plus a schema to a chat model
pub struct Extractor<'a, M: ChatModel> {
    chat: &'a M,
    model: String,
    temperature: f32,
}

impl<'a, M: ChatModel> Extractor<'a, M> {
    pub fn new(chat: &'a M, model: &str) -> Self {
        Self {
            chat,
            model: model.to_string(),
            temperature: 0.0,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Extract fields for `kind`; empty map on any failure
    pub async fn extract(&self, kind: RecordKind, text: &str) -> FieldMap {
        match self.try_extract(kind, text).await {
            Ok(fields) => {
                log::info!("Parsed {} with {} fields", kind, fields.len());
                fields
            }
            Err(e) => {
                log::error!("Failed to parse {} text: {}", kind, e);
                FieldMap::new()
            }
        }
    }

    pub async fn try_extract(&self, kind: RecordKind, text: &str) -> Result<FieldMap> {
        let schema = DocumentSchema::for_kind(kind);
        let user = fill(
            prompts::EXTRACTION_USER,
            &[("format_instructions", &schema.format_instructions()), ("query", text)],
        );
        let request = ChatRequest::new(&self.model, prompts::EXTRACTION_SYSTEM, user)
            .temperature(self.temperature);

        let response = self.chat.complete(&request).await?;
        parse_fields(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FixedChat {
        reply: Result<String>,
        seen: Mutex<Vec<ChatRequest>>,
    }

    impl FixedChat {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl ChatModel for FixedChat {
        async fn complete(&self, request: &ChatRequest) -> Result<String> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(HrError::Llm(e.to_string())),
            }
        }
    }

    #[test]
    fn test_parse_fields_flattens_values() {
        let fields = parse_fields(
            r#"```json
{"position": "Python developer", "skills": ["Python", "SQL"], "requirements": "None", "company": null}
```"#,
        )
        .unwrap();

        assert_eq!(fields["position"], "Python developer");
        assert_eq!(fields["skills"], "Python, SQL");
        assert_eq!(fields["requirements"], "");
        assert_eq!(fields["company"], "");
    }

    #[test]
    fn test_parse_fields_rejects_non_objects() {
        assert!(parse_fields("[1, 2]").is_err());
        assert!(parse_fields("not json at all").is_err());
    }

    #[test]
    fn test_schema_instructions_list_fields() {
        let instructions = VACANCY_SCHEMA.format_instructions();
        for field in ["position", "company", "skills", "requirements", "responsibilities"] {
            assert!(instructions.contains(field), "missing {}", field);
        }
        let schema = RESUME_SCHEMA.json_schema();
        assert_eq!(schema["properties"]["experience"]["title"], "Experience");
        assert_eq!(schema["required"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_extract_sends_text_at_zero_temperature() {
        let chat = FixedChat::replying(r#"{"position": "Data engineer", "skills": "Spark", "experience": "4 years"}"#);
        let extractor = Extractor::new(&chat, "gpt-3.5-turbo");

        let fields = extractor.extract(RecordKind::Resume, "Resume of a data engineer").await;
        assert_eq!(fields["position"], "Data engineer");

        let seen = chat.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].temperature, 0.0);
        assert!(seen[0].user.starts_with("Follow the instructions:"));
        assert!(seen[0].user.contains("Resume of a data engineer"));
    }

    #[tokio::test]
    async fn test_extract_failure_yields_empty_map() {
        let chat = FixedChat {
            reply: Err(HrError::Llm("rate limited".to_string())),
            seen: Mutex::new(Vec::new()),
        };
        let extractor = Extractor::new(&chat, "gpt-3.5-turbo");
        assert!(extractor.extract(RecordKind::Vacancy, "text").await.is_empty());

        let garbage = FixedChat::replying("I could not parse this document.");
        let extractor = Extractor::new(&garbage, "gpt-3.5-turbo");
        assert!(extractor.extract(RecordKind::Vacancy, "text").await.is_empty());
    }
}
