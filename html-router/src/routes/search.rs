use axum::{
    extract::{FromRef, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::empty_string_as_none;
use crate::{error::HtmlError, html_state::HtmlState};

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    HtmlState: FromRef<S>,
{
    Router::new().route("/search", get(search_handler))
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    query: Option<String>,
}

#[derive(Serialize)]
struct SearchResultForResponse {
    id: String,
    score: f32,
    summary: String,
}

/// Ranked retrieval without the LLM round trip.
pub async fn search_handler(
    State(state): State<HtmlState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, HtmlError> {
    let Some(query) = params.query else {
        return Ok(Json(Vec::<SearchResultForResponse>::new()));
    };
    let trimmed_query = query.trim();
    if trimmed_query.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let snapshot = state.index.snapshot();
    let results: Vec<SearchResultForResponse> = snapshot
        .search(trimmed_query)
        .into_iter()
        .take(state.config.context_documents)
        .filter(|ranked| ranked.score > 0.0)
        .filter_map(|ranked| {
            snapshot
                .documents()
                .iter()
                .find(|document| document.id == ranked.id)
                .map(|document| SearchResultForResponse {
                    id: ranked.id,
                    score: ranked.score,
                    summary: document.summary.clone(),
                })
        })
        .collect();

    Ok(Json(results))
}
