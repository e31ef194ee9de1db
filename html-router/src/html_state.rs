use std::sync::Arc;

use common::error::AppError;
use common::utils::config::AppConfig;
use common::utils::template_engine::TemplateEngine;
use retrieval_index::{DocumentIndex, Summarizer};

use crate::OpenAIClientType;

#[derive(Clone)]
pub struct HtmlState {
    pub index: Arc<DocumentIndex>,
    pub openai_client: Arc<OpenAIClientType>,
    pub templates: Arc<TemplateEngine>,
    pub summarizer: Arc<dyn Summarizer>,
    pub config: AppConfig,
}

impl HtmlState {
    pub fn new_with_resources(
        index: Arc<DocumentIndex>,
        openai_client: Arc<OpenAIClientType>,
        summarizer: Arc<dyn Summarizer>,
        config: AppConfig,
    ) -> Result<Self, AppError> {
        let mut templates = TemplateEngine::new();
        templates.add_template("index.html", include_str!("../templates/index.html"))?;

        Ok(Self {
            index,
            openai_client,
            templates: Arc::new(templates),
            summarizer,
            config,
        })
    }
}
