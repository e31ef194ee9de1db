use axum::{
    extract::{FromRef, State},
    response::IntoResponse,
    routing::post,
    Form, Json, Router,
};
use common::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::{answer, error::HtmlError, html_state::HtmlState};

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    HtmlState: FromRef<S>,
{
    Router::new().route("/query", post(query_handler))
}

#[derive(Deserialize)]
pub struct QueryForm {
    pub query: String,
}

#[derive(Serialize)]
struct SourceForResponse {
    id: String,
    score: f32,
}

/// Answers a question over the stored documents: rank the corpus, hand the
/// top matches to the LLM as context, return its answer plus the sources
/// that backed it.
pub async fn query_handler(
    State(state): State<HtmlState>,
    Form(form): Form<QueryForm>,
) -> Result<impl IntoResponse, HtmlError> {
    let query = form.query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("query must not be empty".into()).into());
    }

    // One snapshot for both ranking and context assembly, so a concurrent
    // save cannot shift row order mid-request.
    let snapshot = state.index.snapshot();
    let ranking = snapshot.search(query);
    let context_text = snapshot.context_for(&ranking, state.config.context_documents);
    debug!(
        corpus_size = snapshot.len(),
        context_bytes = context_text.len(),
        "Assembled retrieval context"
    );

    let request = answer::create_chat_request(
        answer::create_user_message(&context_text, query),
        &state.config,
    )?;
    let response = state.openai_client.chat().create(request).await?;
    let answer_text = answer::process_llm_response(response)?;

    let sources: Vec<SourceForResponse> = ranking
        .into_iter()
        .take(state.config.context_documents)
        .filter(|ranked| ranked.score > 0.0)
        .map(|ranked| SourceForResponse {
            id: ranked.id,
            score: ranked.score,
        })
        .collect();

    Ok(Json(json!({
        "response": answer_text,
        "sources": sources,
    })))
}
