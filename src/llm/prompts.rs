//! Prompt templates
//!
//! Placeholders are written as `{name}` and filled with [`fill`].

use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\{(\w+)\}").ok());

/// Replace every `{key}` in `template` with its value in one pass; inserted
/// values are never scanned for placeholders
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let Some(placeholder) = PLACEHOLDER.as_ref() else {
        log::error!("Placeholder pattern failed to compile");
        return template.to_string();
    };

    placeholder
        .replace_all(template, |caps: &Captures| {
            let key = &caps[1];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

pub const EXTRACTION_SYSTEM: &str = "You are a precise parser of HR documents. \
    You respond with valid JSON only.";

pub const EXTRACTION_USER: &str = "Follow the instructions:\n{format_instructions}\n{query}\n";

pub const FORMAT_INSTRUCTIONS: &str = "The output should be formatted as a JSON instance that conforms to the JSON schema below.

As an example, for the schema {\"properties\": {\"foo\": {\"title\": \"Foo\", \"description\": \"a list of strings\", \"type\": \"array\", \"items\": {\"type\": \"string\"}}}, \"required\": [\"foo\"]}
the object {\"foo\": [\"bar\", \"baz\"]} is a well-formatted instance of the schema. The object {\"properties\": {\"foo\": [\"bar\", \"baz\"]}} is not well-formatted.

Here is the output schema:
```
{schema}
```";

pub const GREETING: &str = "Hello! Let's start the interview. Here is the plan:\n \
    1. I will ask you a few questions.\n \
    2. I will tell you about our company and the open position.\n \
    3. I will answer your questions.\n \
    Please talk to me as you would to a regular recruiter!";

pub const FOLLOW_UP_SYSTEM: &str = "You are an experienced recruiter interviewing a candidate \
    for the position {position}. You analyse the candidate's resume and answers and find gaps \
    that need clarification with respect to the vacancy requirements.";

pub const FOLLOW_UP_USER: &str = "Based on the resume, the interview so far and the vacancy text, \
    write 3 to 5 additional questions that clarify the candidate's fit for the position {position}. \
    Each question must be on its own line and start with its number followed by a dot, \
    for example \"1. ...\". Do not add any other text.

INTERVIEW:
{summary}

VACANCY:
{vacancy}";

pub const PRESENTATION_INTRO: &str = "Thank you for answering all the additional questions. \
    Now I would like to tell you more about our organization. Press Enter when you are ready.";

pub const QA_INTRO: &str = "If you have any questions left, please ask them and I will try to answer. \
    If you have no questions, just type \"{exit_phrase}\" and we will finish the interview.";

pub const QA_FAREWELL: &str = "Thank you for the interview! We wish you good luck!";

pub const QA_APOLOGY: &str = "Sorry, I cannot answer this question. Please try asking another one.";

pub const QA_SYSTEM: &str = "You are an experienced recruiter conducting an interview for the position {position}.
You know the company well: its values, processes and expectations of employees.
Your task is to give the candidate informative, accurate and honest answers about the company and the vacancy.
Answer briefly but completely, in a friendly and professional tone.
If a question is not related to the vacancy or the company, politely steer the conversation back to the interview.
If you do not know the exact answer, do not make things up; say that the details need to be clarified.";

pub const QA_USER: &str = "INSTRUCTIONS:

1. Use the provided knowledge base to answer the candidate's question
2. Use only information for the position {position} or information common to all positions
3. Ignore information about other positions
4. Answer in complete, well-formed sentences
5. Do not use formal labels such as \"Answer:\"
6. If the knowledge base has nothing relevant, give a general answer based on typical recruiting practice
7. If the question is not professional, politely say that it is not related to the current interview

CANDIDATE QUESTION:
{question}";

pub const QA_QUERY: &str = "Question about position: {position}: {question}";

pub const KEY_REQUIREMENTS_SYSTEM: &str = "You are an experienced HR analyst. You extract the key \
    requirements a candidate must meet from a vacancy description.";

pub const KEY_REQUIREMENTS_USER: &str = "List the key requirements for a candidate for the position \
    {position}: hard skills, experience, education and soft skills. Use a short numbered list.

TEXT TO ANALYSE:
{vacancy}";

pub const ASSESSMENT_SYSTEM: &str = "You are an experienced recruiter at {company}. You write \
    objective, evidence-based assessments of candidates after interviews.";

pub const ASSESSMENT_USER: &str = "Assess the candidate for the position {position} at {company}.

For each key requirement state whether the interview confirms it, with evidence from the answers.
Then list strengths, weaknesses and risks, and finish with an overall recommendation
(recommended / recommended with reservations / not recommended) and a score from 1 to 10.

KEY REQUIREMENTS:
{requirements}

VACANCY:
{vacancy}

INTERVIEW TRANSCRIPT:
{transcript}";
