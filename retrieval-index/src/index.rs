use std::sync::{Arc, Mutex, RwLock};

use common::error::AppError;
use tracing::{debug, info};

use crate::ranking::{rank, RankedDocument};
use crate::store::{Document, DocumentStore};
use crate::vectorizer::{SparseVector, TfidfVectorizer};

/// One immutable fitted state of the index: the corpus, its vocabulary and
/// the L2-normalized row matrix, mutually consistent by construction.
pub struct Snapshot {
    store: DocumentStore,
    vectorizer: TfidfVectorizer,
    matrix: Vec<SparseVector>,
    ids: Vec<String>,
}

impl Snapshot {
    fn build(store: DocumentStore) -> Self {
        let (vectorizer, matrix) =
            TfidfVectorizer::fit(store.documents().iter().map(|document| document.text.as_str()));
        let ids = store
            .documents()
            .iter()
            .map(|document| document.id.clone())
            .collect();
        Self {
            store,
            vectorizer,
            matrix,
            ids,
        }
    }

    /// Ranks the whole corpus against `query`, descending, ties in corpus
    /// order. An empty corpus yields an empty result, not an error.
    pub fn search(&self, query: &str) -> Vec<RankedDocument> {
        if self.store.is_empty() {
            return Vec::new();
        }
        let query_vector = self.vectorizer.transform(query);
        rank(&query_vector, &self.matrix, &self.ids)
    }

    /// Concatenates the texts of the top `top_n` ranked documents for use
    /// as LLM context. Zero-score entries share no terms with the query and
    /// are left out.
    pub fn context_for(&self, ranking: &[RankedDocument], top_n: usize) -> String {
        ranking
            .iter()
            .take(top_n)
            .filter(|ranked| ranked.score > 0.0)
            .filter_map(|ranked| self.store.get(&ranked.id))
            .map(|document| document.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn documents(&self) -> &[Document] {
        self.store.documents()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

/// Owns the current [`Snapshot`] and republishes a fresh one on every
/// insert. Readers clone the current `Arc` and are unaffected by a
/// concurrent swap; writers serialize on a dedicated mutex so rebuilds
/// never interleave.
pub struct DocumentIndex {
    snapshot: RwLock<Arc<Snapshot>>,
    writer: Mutex<()>,
}

impl DocumentIndex {
    pub fn new(store: DocumentStore) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(Snapshot::build(store))),
            writer: Mutex::new(()),
        }
    }

    /// The fitted state current at call entry. Valid for the caller's whole
    /// request even if an insert swaps in a successor meanwhile.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        match self.snapshot.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Searches the current snapshot. Never triggers a rebuild.
    pub fn search(&self, query: &str) -> Vec<RankedDocument> {
        self.snapshot().search(query)
    }

    /// Appends a document and refits vocabulary and matrix over the whole
    /// updated corpus. IDF weights are corpus-wide statistics, so there is
    /// no incremental append; the full rebuild is O(corpus size), accepted
    /// for corpora of at most a few hundred short documents.
    pub fn insert(
        &self,
        id: impl Into<String>,
        text: impl Into<String>,
        summary: impl Into<String>,
    ) -> Result<(), AppError> {
        let document = Document {
            id: id.into(),
            text: text.into(),
            summary: summary.into(),
        };

        let _writer = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut store = self.snapshot().store.clone();
        store.insert(document)?;

        debug!(corpus_size = store.len(), "Refitting document index");
        let next = Arc::new(Snapshot::build(store));

        match self.snapshot.write() {
            Ok(mut guard) => *guard = Arc::clone(&next),
            Err(poisoned) => *poisoned.into_inner() = Arc::clone(&next),
        }
        info!(corpus_size = next.len(), "Document index rebuilt");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}
