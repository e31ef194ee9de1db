use std::collections::HashSet;
use std::path::Path;

use common::error::AppError;
use serde::Serialize;
use tracing::{info, warn};

use crate::summarize::Summarizer;

/// One stored document. Immutable once inserted; a changed document is a
/// new insert under a new id, never a patch.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub summary: String,
}

/// Authoritative id -> document mapping. Insertion order defines the row
/// order of the fitted matrix, so the store is append-only.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
    ids: HashSet<String>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-loads every `*.txt` file under `dir`, one document per file with
    /// the file name as id. Unreadable files are logged and skipped; an
    /// unreadable directory fails the whole load.
    ///
    /// Directory iteration order is platform-dependent, so entries are
    /// sorted by id before insertion to keep corpus order stable.
    pub async fn load_all(
        dir: impl AsRef<Path>,
        summarizer: &dyn Summarizer,
    ) -> Result<Self, AppError> {
        let dir = dir.as_ref();
        let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| {
            AppError::Load(format!(
                "cannot read document directory {}: {e}",
                dir.display()
            ))
        })?;

        let mut loaded: Vec<(String, String)> = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    return Err(AppError::Load(format!(
                        "failed while listing {}: {e}",
                        dir.display()
                    )))
                }
            };

            let path = entry.path();
            if path.extension().and_then(|extension| extension.to_str()) != Some("txt") {
                continue;
            }
            let Some(id) = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_owned)
            else {
                continue;
            };

            match tokio::fs::read_to_string(&path).await {
                Ok(text) => loaded.push((id, text)),
                Err(e) => {
                    warn!(file = %path.display(), "skipping unreadable document: {e}");
                }
            }
        }

        loaded.sort_by(|a, b| a.0.cmp(&b.0));

        let mut store = Self::new();
        for (id, text) in loaded {
            match summarizer.summarize(&text).await {
                Ok(summary) => store.insert(Document { id, text, summary })?,
                Err(e) => {
                    warn!(document = %id, "skipping document, summarization failed: {e}");
                }
            }
        }

        info!(documents = store.len(), dir = %dir.display(), "Document load complete");
        Ok(store)
    }

    /// Appends a document. Ids are timestamp- or filename-derived, so a
    /// collision signals a caller bug and is rejected rather than merged.
    pub fn insert(&mut self, document: Document) -> Result<(), AppError> {
        if !self.ids.insert(document.id.clone()) {
            return Err(AppError::DuplicateId(document.id));
        }
        self.documents.push(document);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|document| document.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
