//! Ephemeral per-request vector index.
//!
//! Built fresh over a document's chunks for each ask request and dropped
//! when the request completes. Two concurrent questions about the same
//! document therefore embed the same chunks twice; that redundancy is a
//! known cost of the per-request lifecycle, not a correctness hazard,
//! since an index is never mutated after construction.

use anyhow::Result;

use crate::config::EmbeddingConfig;
use crate::embedding::{cosine_similarity, embed_query, embed_texts};
use crate::models::Chunk;

/// In-memory collection of (vector, chunk) pairs.
pub struct VectorIndex {
    entries: Vec<(Vec<f32>, Chunk)>,
}

impl VectorIndex {
    /// Assemble an index from pre-computed embeddings. Exposed separately
    /// from [`build_index`] so ranking can be exercised without the
    /// embedding service.
    pub fn from_embedded(entries: Vec<(Vec<f32>, Chunk)>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rank chunks by cosine similarity to the query vector, best first,
    /// returning at most `k` entries.
    pub fn rank(&self, query: &[f32], k: usize) -> Vec<(f32, &Chunk)> {
        let mut scored: Vec<(f32, &Chunk)> = self
            .entries
            .iter()
            .map(|(vec, chunk)| (cosine_similarity(query, vec), chunk))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }
}

/// Embed every chunk's text and build the index over the results.
pub async fn build_index(config: &EmbeddingConfig, chunks: Vec<Chunk>) -> Result<VectorIndex> {
    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let vectors = embed_texts(config, &texts).await?;
    Ok(VectorIndex::from_embedded(
        vectors.into_iter().zip(chunks).collect(),
    ))
}

/// Embed the question and return the `k` most relevant chunks, best first.
pub async fn query_index(
    index: &VectorIndex,
    config: &EmbeddingConfig,
    question: &str,
    k: usize,
) -> Result<Vec<Chunk>> {
    let query_vec = embed_query(config, question).await?;
    Ok(index
        .rank(&query_vec, k)
        .into_iter()
        .map(|(_, chunk)| chunk.clone())
        .collect())
}
