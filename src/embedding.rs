//! Embedding service client.
//!
//! Calls the OpenAI embeddings API to turn chunk and question text into
//! fixed-dimension vectors, plus the cosine similarity used to rank them.
//!
//! # Retry strategy
//!
//! Transient failures use exponential backoff:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)
//!
//! Failures always propagate to the caller; retrieval never silently
//! degrades to an unembedded path.

use anyhow::{bail, Result};
use std::time::Duration;

use crate::config::EmbeddingConfig;

const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// Embed a batch of texts, one vector per input in the same order.
///
/// Inputs are sent in sub-batches of `config.batch_size` texts per API
/// call. Fails if `OPENAI_API_KEY` is unset, the API returns a
/// non-retryable error, or all retries are exhausted.
pub async fn embed_texts(config: &EmbeddingConfig, texts: &[String]) -> Result<Vec<Vec<f32>>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let mut embeddings = Vec::with_capacity(texts.len());
    for batch in texts.chunks(config.batch_size.max(1)) {
        let mut batch_vecs = embed_openai(config, batch).await?;
        if batch_vecs.len() != batch.len() {
            bail!(
                "embedding service returned {} vectors for {} inputs",
                batch_vecs.len(),
                batch.len()
            );
        }
        embeddings.append(&mut batch_vecs);
    }
    Ok(embeddings)
}

/// Embed a single query text (e.g. the user's question).
pub async fn embed_query(config: &EmbeddingConfig, text: &str) -> Result<Vec<f32>> {
    let results = embed_texts(config, &[text.to_string()]).await?;
    results
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("embedding service returned an empty response"))
}

async fn embed_openai(config: &EmbeddingConfig, texts: &[String]) -> Result<Vec<Vec<f32>>> {
    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| anyhow::anyhow!("embedding service unavailable: OPENAI_API_KEY not set"))?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let body = serde_json::json!({
        "model": config.model,
        "input": texts,
    });

    let mut last_err = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            let delay = Duration::from_secs(1 << (attempt - 1).min(5));
            tokio::time::sleep(delay).await;
        }

        let resp = client
            .post(OPENAI_EMBEDDINGS_URL)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await;

        match resp {
            Ok(response) => {
                let status = response.status();

                if status.is_success() {
                    let json: serde_json::Value = response.json().await?;
                    return parse_embeddings_response(&json);
                }

                // Rate limited or server error — retry
                if status.as_u16() == 429 || status.is_server_error() {
                    let body_text = response.text().await.unwrap_or_default();
                    last_err = Some(anyhow::anyhow!(
                        "embedding service error {}: {}",
                        status,
                        body_text
                    ));
                    continue;
                }

                // Client error (not 429) — don't retry
                let body_text = response.text().await.unwrap_or_default();
                bail!("embedding service error {}: {}", status, body_text);
            }
            Err(e) => {
                last_err = Some(anyhow::anyhow!("embedding service request failed: {}", e));
                continue;
            }
        }
    }

    Err(last_err
        .unwrap_or_else(|| anyhow::anyhow!("embedding service failed after retries")))
}

/// Extract the `data[].embedding` arrays from an embeddings API response,
/// ordered by the returned `index` so output order matches input order.
fn parse_embeddings_response(json: &serde_json::Value) -> Result<Vec<Vec<f32>>> {
    let data = json
        .get("data")
        .and_then(|d| d.as_array())
        .ok_or_else(|| anyhow::anyhow!("embedding service response missing data array"))?;

    let mut indexed: Vec<(usize, Vec<f32>)> = Vec::with_capacity(data.len());

    for (pos, item) in data.iter().enumerate() {
        let embedding = item
            .get("embedding")
            .and_then(|e| e.as_array())
            .ok_or_else(|| anyhow::anyhow!("embedding service response missing embedding"))?;

        let mut vec: Vec<f32> = Vec::with_capacity(embedding.len());
        for v in embedding {
            let value = v.as_f64().ok_or_else(|| {
                anyhow::anyhow!("embedding service response contains non-numeric embedding value")
            })?;
            vec.push(value as f32);
        }

        let index = item
            .get("index")
            .and_then(|i| i.as_u64())
            .map(|i| i as usize)
            .unwrap_or(pos);
        indexed.push((index, vec));
    }

    indexed.sort_by_key(|(i, _)| *i);
    Ok(indexed.into_iter().map(|(_, v)| v).collect())
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in `[-1.0, 1.0]`; `0.0` for empty vectors or vectors
/// of different lengths.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_identical() {
        let v = vec![1.0, 2.0, 3.0];
        let sim = cosine_similarity(&v, &v);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn cosine_opposite() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_empty_or_mismatched() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
    }

    #[test]
    fn parse_response_orders_by_index() {
        let json = serde_json::json!({
            "data": [
                { "index": 1, "embedding": [0.5, 0.5] },
                { "index": 0, "embedding": [1.0, 0.0] },
            ]
        });
        let vecs = parse_embeddings_response(&json).unwrap();
        assert_eq!(vecs[0], vec![1.0, 0.0]);
        assert_eq!(vecs[1], vec![0.5, 0.5]);
    }

    #[test]
    fn parse_response_rejects_non_numeric_values() {
        let json = serde_json::json!({
            "data": [
                { "index": 0, "embedding": [0.25, "oops", 0.75] },
            ]
        });
        assert!(parse_embeddings_response(&json).is_err());
    }

    #[test]
    fn parse_response_rejects_missing_data() {
        let json = serde_json::json!({ "error": "nope" });
        assert!(parse_embeddings_response(&json).is_err());
    }
}
