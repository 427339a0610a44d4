//! Core data models used throughout askdoc.
//!
//! These types represent the documents, chunks, and answers that flow
//! through the upload and question-answering pipeline.

use serde::Serialize;

/// An uploaded document persisted in SQLite.
///
/// The `body` (extracted text) is written once at upload time and treated
/// as immutable input to every later question about the document.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub name: String,
    /// Format tag the document was uploaded with: `pdf`, `docx`, or `txt`.
    pub format: String,
    /// The raw uploaded file bytes.
    pub file: Vec<u8>,
    /// Full extracted text.
    pub body: String,
    /// SHA-256 of the raw file bytes.
    pub dedup_hash: String,
    /// Unix timestamp of the upload.
    pub created_at: i64,
}

/// Listing row for a stored document (no file bytes or body).
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub id: String,
    pub name: String,
    pub format: String,
    pub created_at: i64,
}

/// A span of a document's body text.
///
/// Chunks are ephemeral: they are rebuilt on every ask request and never
/// persisted. `start` and `end` are character offsets into the body, so the
/// overlap between neighboring chunks is `end[i] - start[i + 1]`.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub document_id: String,
    pub chunk_index: i64,
    /// Start offset into the body, in characters.
    pub start: usize,
    /// End offset into the body (exclusive), in characters.
    pub end: usize,
    pub text: String,
}

/// Result of answering a question about a document.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponse {
    pub question: String,
    pub answer: String,
    pub document_name: String,
}
