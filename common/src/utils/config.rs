use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SummarizerKind {
    Truncate,
    Llm,
}

fn default_summarizer_kind() -> SummarizerKind {
    SummarizerKind::Truncate
}

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    pub openai_api_key: String,
    #[serde(default = "default_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_query_model")]
    pub query_model: String,
    #[serde(default = "default_query_system_prompt")]
    pub query_system_prompt: String,
    #[serde(default = "default_max_answer_tokens")]
    pub max_answer_tokens: u32,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default = "default_documents_dir")]
    pub documents_dir: String,
    #[serde(default = "default_context_documents")]
    pub context_documents: usize,
    #[serde(default = "default_summarizer_kind")]
    pub summarizer: SummarizerKind,
    #[serde(default = "default_summary_lines")]
    pub summary_lines: usize,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_query_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_query_system_prompt() -> String {
    "Answer the question given the following context".to_string()
}

fn default_max_answer_tokens() -> u32 {
    150
}

fn default_http_port() -> u16 {
    5000
}

fn default_documents_dir() -> String {
    "./documents".to_string()
}

fn default_context_documents() -> usize {
    5
}

fn default_summary_lines() -> usize {
    3
}

pub fn get_config() -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::default())
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in_everything_but_the_api_key() {
        let config = Config::builder()
            .set_override("openai_api_key", "test-key")
            .unwrap()
            .build()
            .unwrap();

        let app_config: AppConfig = config.try_deserialize().unwrap();

        assert_eq!(app_config.openai_api_key, "test-key");
        assert_eq!(app_config.http_port, 5000);
        assert_eq!(app_config.documents_dir, "./documents");
        assert_eq!(app_config.context_documents, 5);
        assert_eq!(app_config.summarizer, SummarizerKind::Truncate);
        assert_eq!(app_config.summary_lines, 3);
        assert_eq!(app_config.query_model, "gpt-4o-mini");
        assert_eq!(app_config.max_answer_tokens, 150);
    }

    #[test]
    fn summarizer_kind_is_case_insensitive_lowercase() {
        let config = Config::builder()
            .set_override("openai_api_key", "test-key")
            .unwrap()
            .set_override("summarizer", "llm")
            .unwrap()
            .build()
            .unwrap();

        let app_config: AppConfig = config.try_deserialize().unwrap();
        assert_eq!(app_config.summarizer, SummarizerKind::Llm);
    }
}
