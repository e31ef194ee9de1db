use axum::{
    extract::{FromRef, State},
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use minijinja::context;
use serde::Serialize;

use crate::{error::HtmlError, html_state::HtmlState};

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    HtmlState: FromRef<S>,
{
    Router::new().route("/", get(index_handler))
}

#[derive(Serialize)]
struct DocumentForTemplate {
    id: String,
    summary: String,
}

pub async fn index_handler(State(state): State<HtmlState>) -> Result<impl IntoResponse, HtmlError> {
    let snapshot = state.index.snapshot();
    let documents: Vec<DocumentForTemplate> = snapshot
        .documents()
        .iter()
        .map(|document| DocumentForTemplate {
            id: document.id.clone(),
            summary: document.summary.clone(),
        })
        .collect();

    let document_count = documents.len();
    let rendered = state.templates.render(
        "index.html",
        &context! {
            documents => documents,
            document_count => document_count,
        },
    )?;

    Ok(Html(rendered))
}
