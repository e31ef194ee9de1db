use async_openai::{
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse,
    },
};
use common::{error::AppError, utils::config::AppConfig};

pub fn create_user_message(context: &str, query: &str) -> String {
    format!("{context}\n\nUser question: {query}")
}

pub fn create_chat_request(
    user_message: String,
    config: &AppConfig,
) -> Result<CreateChatCompletionRequest, OpenAIError> {
    CreateChatCompletionRequestArgs::default()
        .model(&config.query_model)
        .max_tokens(config.max_answer_tokens)
        .messages([
            ChatCompletionRequestSystemMessage::from(config.query_system_prompt.clone()).into(),
            ChatCompletionRequestUserMessage::from(user_message).into(),
        ])
        .build()
}

pub fn process_llm_response(response: CreateChatCompletionResponse) -> Result<String, AppError> {
    response
        .choices
        .first()
        .and_then(|choice| choice.message.content.as_ref())
        .map(|content| content.trim().to_owned())
        .ok_or(AppError::LLMParsing(
            "No content found in LLM response".into(),
        ))
}
