//! Chat completion access
//!
//! Every LLM call in the crate goes through the [`ChatModel`] trait. The
//! production implementation is [`OpenAiChat`]; tests substitute scripted
//! models.

pub mod extraction;
pub mod prompts;

pub use extraction::{DocumentSchema, Extractor, parse_fields};

use crate::config::LlmConfig;
use crate::error::{HrError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessage, ChatCompletionRequestSystemMessageContent,
    ChatCompletionRequestUserMessage, ChatCompletionRequestUserMessageContent,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;

/// One chat completion: system prompt, optional prior assistant turn, user prompt
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub assistant: Option<String>,
    pub model: String,
    pub temperature: f32,
}

impl ChatRequest {
    pub fn new(model: &str, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            assistant: None,
            model: model.to_string(),
            temperature: 0.1,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn assistant(mut self, content: impl Into<String>) -> Self {
        self.assistant = Some(content.into());
        self
    }
}

/// Text-in, text-out chat model
pub trait ChatModel {
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}

impl<M: ChatModel> ChatModel for &M {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        (**self).complete(request).await
    }
}

/// Build an OpenAI client from configuration
pub fn create_client(config: &LlmConfig) -> Client<OpenAIConfig> {
    let openai_config = match config.base_url.as_deref() {
        Some(base_url) => OpenAIConfig::new()
            .with_api_key(&config.api_key)
            .with_api_base(base_url),
        None => OpenAIConfig::new().with_api_key(&config.api_key),
    };
    Client::with_config(openai_config)
}

/// Price in dollars per million tokens, `(input, output)`
pub fn model_price(model: &str) -> (f64, f64) {
    match model {
        "gpt-4o" => (5.0, 15.0),
        "gpt-4o-mini" => (0.15, 0.60),
        "gpt-3.5-turbo" => (0.0005, 0.0015),
        other => {
            log::warn!("Unknown model: {}, using gpt-4o-mini prices", other);
            (0.15, 0.60)
        }
    }
}

/// Estimated request cost in dollars
pub fn estimate_cost(model: &str, prompt_tokens: u32, completion_tokens: u32) -> f64 {
    let (input, output) = model_price(model);
    input * prompt_tokens as f64 / 1e6 + output * completion_tokens as f64 / 1e6
}

/// Chat model backed by the OpenAI chat completions API
#[derive(Clone)]
pub struct OpenAiChat {
    client: Client<OpenAIConfig>,
}

impl OpenAiChat {
    pub fn new(client: Client<OpenAIConfig>) -> Self {
        Self { client }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(create_client(config))
    }

    fn messages(request: &ChatRequest) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut messages = vec![ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(request.system.clone()),
                name: None,
            },
        )];

        if let Some(assistant) = request.assistant.as_deref().filter(|a| !a.is_empty()) {
            let message = ChatCompletionRequestAssistantMessageArgs::default()
                .content(assistant)
                .build()?;
            messages.push(ChatCompletionRequestMessage::Assistant(message));
        }

        messages.push(ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(request.user.clone()),
            name: None,
        }));
        Ok(messages)
    }
}

impl ChatModel for OpenAiChat {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&request.model)
            .messages(Self::messages(request)?)
            .temperature(request.temperature)
            .build()?;

        let response = self.client.chat().create(chat_request).await?;

        if let Some(usage) = &response.usage {
            let cost = estimate_cost(&request.model, usage.prompt_tokens, usage.completion_tokens);
            log::info!(
                "Tokens used: {} (input) + {} (output) = {} (total). *** {} *** $ {:.5}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens,
                request.model,
                cost
            );
        }

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| HrError::Llm("No content in chat response".to_string()))
    }
}

/// Strip a surrounding ```json / ``` code fence from model output
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = if let Some(stripped) = text.strip_prefix("```json") {
        stripped
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
    } else {
        return text;
    };
    inner.trim_end().strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_strip_json_fences() {
        assert_eq!(strip_json_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_json_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_json_fences("  {\"b\": 2} "), "{\"b\": 2}");
        assert_eq!(strip_json_fences("```json\n{\"c\": 3}"), "{\"c\": 3}");
    }

    #[test]
    fn test_cost_estimate() {
        assert_relative_eq!(estimate_cost("gpt-4o", 1_000_000, 0), 5.0);
        assert_relative_eq!(estimate_cost("gpt-4o", 0, 1_000_000), 15.0);
        // unknown models use gpt-4o-mini prices
        assert_relative_eq!(
            estimate_cost("some-local-model", 1_000_000, 1_000_000),
            estimate_cost("gpt-4o-mini", 1_000_000, 1_000_000)
        );
    }

    #[test]
    fn test_request_builder() {
        let request = ChatRequest::new("gpt-4o", "system", "user")
            .temperature(0.3)
            .assistant("previous");
        assert_eq!(request.model, "gpt-4o");
        assert_relative_eq!(request.temperature, 0.3);
        assert_eq!(request.assistant.as_deref(), Some("previous"));
    }

    #[test]
    fn test_messages_skip_empty_assistant() {
        let request = ChatRequest::new("gpt-4o", "sys", "usr").assistant("");
        let messages = OpenAiChat::messages(&request).unwrap();
        assert_eq!(messages.len(), 2);

        let request = ChatRequest::new("gpt-4o", "sys", "usr").assistant("earlier answer");
        assert_eq!(OpenAiChat::messages(&request).unwrap().len(), 3);
    }
}
