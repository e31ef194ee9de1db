use std::sync::Arc;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use common::error::AppError;

/// Pluggable `text -> summary` strategy. Which one is active is a
/// configuration decision outside the ranking engine.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, AppError>;
}

/// Structural summarizer: the first N non-empty lines of the document.
#[derive(Debug, Clone)]
pub struct FirstLinesSummarizer {
    lines: usize,
}

impl FirstLinesSummarizer {
    pub fn new(lines: usize) -> Self {
        Self {
            lines: lines.max(1),
        }
    }
}

#[async_trait]
impl Summarizer for FirstLinesSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, AppError> {
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(self.lines)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

const SUMMARY_SYSTEM_PROMPT: &str =
    "Summarize the following document in one or two short sentences.";
const SUMMARY_MAX_TOKENS: u32 = 60;

/// LLM-backed summarizer, for deployments that prefer an abstractive
/// summary over a structural one.
pub struct LlmSummarizer {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
}

impl LlmSummarizer {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, AppError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .max_tokens(SUMMARY_MAX_TOKENS)
            .messages([
                ChatCompletionRequestSystemMessage::from(SUMMARY_SYSTEM_PROMPT).into(),
                ChatCompletionRequestUserMessage::from(text).into(),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_ref())
            .map(|content| content.trim().to_owned())
            .ok_or_else(|| AppError::LLMParsing("No content found in summary response".into()))
    }
}
