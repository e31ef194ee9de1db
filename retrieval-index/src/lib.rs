//! In-memory TF-IDF retrieval over a small, growing set of text documents.
//!
//! The [`DocumentIndex`] owns the current fitted state as an immutable
//! [`Snapshot`] and republishes a fresh one whenever a document is saved.
//! Searches are pure reads over the snapshot current at call entry, so they
//! never contend with an in-flight rebuild.

pub mod index;
pub mod ranking;
pub mod store;
pub mod summarize;
pub mod vectorizer;

pub use index::{DocumentIndex, Snapshot};
pub use ranking::RankedDocument;
pub use store::{Document, DocumentStore};
pub use summarize::{FirstLinesSummarizer, LlmSummarizer, Summarizer};
