//! Question-answering pipeline orchestration.
//!
//! Coordinates the full ask flow: document lookup → chunking → ephemeral
//! vector index → top-k retrieval → answer generation. The index lives
//! only for the duration of one call and is dropped with the response,
//! discarding its embeddings (per-request rebuild is the specified
//! lifecycle; there is no cross-request cache).

use anyhow::Result;
use sqlx::SqlitePool;

use crate::chunk::split_text;
use crate::config::Config;
use crate::generate::generate_answer;
use crate::index::{build_index, query_index};
use crate::models::AnswerResponse;
use crate::store;

/// Answer a question about a stored document.
///
/// Fails with a `document not found` message for unknown ids, an
/// `embedding service` message if embedding fails, and a `generation`
/// message if the language model call fails. All three propagate to the
/// caller for classification at the request boundary.
pub async fn answer_question(
    config: &Config,
    pool: &SqlitePool,
    document_id: &str,
    question: &str,
) -> Result<AnswerResponse> {
    let document = store::get_document(pool, document_id).await?;

    let chunks = split_text(
        &document.id,
        &document.body,
        config.chunking.chunk_size,
        config.chunking.overlap,
    );

    let index = build_index(&config.embedding, chunks).await?;
    let context = query_index(&index, &config.embedding, question, config.retrieval.top_k).await?;
    let answer = generate_answer(&config.generation, question, &context).await?;

    Ok(AnswerResponse {
        question: question.to_string(),
        answer,
        document_name: document.name,
    })
}
