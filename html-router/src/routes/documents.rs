use axum::{
    extract::{FromRef, State},
    response::IntoResponse,
    routing::get,
    Form, Json, Router,
};
use chrono::Utc;
use common::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use super::empty_string_as_none;
use crate::{error::HtmlError, html_state::HtmlState};

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    HtmlState: FromRef<S>,
{
    Router::new().route("/documents", get(list_documents_handler).post(save_document_handler))
}

#[derive(Deserialize)]
pub struct SaveDocumentForm {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub id: Option<String>,
    pub text: String,
}

#[derive(Serialize)]
struct DocumentForResponse {
    id: String,
    summary: String,
}

pub async fn list_documents_handler(
    State(state): State<HtmlState>,
) -> Result<impl IntoResponse, HtmlError> {
    let snapshot = state.index.snapshot();
    let documents: Vec<DocumentForResponse> = snapshot
        .documents()
        .iter()
        .map(|document| DocumentForResponse {
            id: document.id.clone(),
            summary: document.summary.clone(),
        })
        .collect();

    Ok(Json(documents))
}

/// Save event: persist the raw text to the documents directory, summarize
/// it, and insert it into the index (which refits and swaps the snapshot).
pub async fn save_document_handler(
    State(state): State<HtmlState>,
    Form(form): Form<SaveDocumentForm>,
) -> Result<impl IntoResponse, HtmlError> {
    if form.text.trim().is_empty() {
        return Err(AppError::Validation("document text must not be empty".into()).into());
    }

    let id = match form.id {
        Some(id) => validate_document_id(id)?,
        None => Utc::now().format("note-%Y%m%d%H%M%S.txt").to_string(),
    };
    if state.index.snapshot().documents().iter().any(|d| d.id == id) {
        return Err(AppError::DuplicateId(id).into());
    }

    let summary = state.summarizer.summarize(&form.text).await?;

    let path = std::path::Path::new(&state.config.documents_dir).join(&id);
    if let Err(e) = tokio::fs::write(&path, &form.text).await {
        // The index is authoritative for this process; a failed write only
        // means the document will be absent after a restart.
        warn!(file = %path.display(), "Failed to persist document text: {e}");
    }

    state.index.insert(&id, &form.text, &summary)?;
    info!(document = %id, corpus_size = state.index.len(), "Document saved and indexed");

    Ok(Json(json!({ "id": id, "summary": summary })))
}

/// Ids become file names in the documents directory, so anything that could
/// escape it is rejected.
fn validate_document_id(id: String) -> Result<String, HtmlError> {
    if id.contains('/') || id.contains('\\') || id.contains("..") {
        return Err(AppError::Validation(format!("invalid document id: {id}")).into());
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_escaping_ids_are_rejected() {
        assert!(validate_document_id("../etc/passwd".into()).is_err());
        assert!(validate_document_id("sub/dir.txt".into()).is_err());
        assert!(validate_document_id("win\\style.txt".into()).is_err());
        assert!(validate_document_id("note-20240101.txt".into()).is_ok());
    }
}
