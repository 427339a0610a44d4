//! Answer generation via an external language model.
//!
//! Composes a fixed question-answering prompt from the question and the
//! retrieved context chunks, sends it to the OpenAI chat completions API,
//! and returns the model's response text verbatim. Each call is a single
//! stateless request/response round trip; failures propagate to the
//! caller with a `generation` prefix for classification at the boundary.

use anyhow::{bail, Result};
use std::time::Duration;

use crate::config::GenerationConfig;
use crate::models::Chunk;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

const SYSTEM_PROMPT: &str = "You are an assistant for question-answering tasks. \
Use the following pieces of retrieved context to answer the question. \
If you don't know the answer, just say that you don't know. \
Use three sentences maximum and keep the answer concise.";

/// Compose the user prompt: context chunks joined with blank lines in
/// retrieval order, then the question.
pub fn build_prompt(question: &str, context_chunks: &[Chunk]) -> String {
    let context = context_chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("Question: {}\n\nContext: {}\n\nAnswer:", question, context)
}

/// Generate an answer for the question from the retrieved context.
///
/// Uses the same retry policy as the embedding client: 429/5xx/network
/// errors back off and retry, other 4xx fail immediately.
pub async fn generate_answer(
    config: &GenerationConfig,
    question: &str,
    context_chunks: &[Chunk],
) -> Result<String> {
    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| anyhow::anyhow!("generation unavailable: OPENAI_API_KEY not set"))?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let body = serde_json::json!({
        "model": config.model,
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            { "role": "user", "content": build_prompt(question, context_chunks) },
        ],
    });

    let mut last_err = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            let delay = Duration::from_secs(1 << (attempt - 1).min(5));
            tokio::time::sleep(delay).await;
        }

        let resp = client
            .post(OPENAI_CHAT_URL)
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
                    return parse_chat_response(&json);
                }

                if status.as_u16() == 429 || status.is_server_error() {
                    let body_text = response.text().await.unwrap_or_default();
                    last_err = Some(anyhow::anyhow!(
                        "generation error {}: {}",
                        status,
                        body_text
                    ));
                    continue;
                }

                let body_text = response.text().await.unwrap_or_default();
                bail!("generation error {}: {}", status, body_text);
            }
            Err(e) => {
                last_err = Some(anyhow::anyhow!("generation request failed: {}", e));
                continue;
            }
        }
    }

    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("generation failed after retries")))
}

/// Extract `choices[0].message.content` from a chat completions response.
fn parse_chat_response(json: &serde_json::Value) -> Result<String> {
    json.get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow::anyhow!("generation response missing message content"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: i64, text: &str) -> Chunk {
        Chunk {
            document_id: "doc1".to_string(),
            chunk_index: index,
            start: 0,
            end: text.chars().count(),
            text: text.to_string(),
        }
    }

    #[test]
    fn prompt_contains_question_and_context_in_order() {
        let chunks = vec![chunk(0, "Paris is the capital."), chunk(1, "France is in Europe.")];
        let prompt = build_prompt("What is the capital of France?", &chunks);
        assert!(prompt.contains("What is the capital of France?"));
        let first = prompt.find("Paris is the capital.").unwrap();
        let second = prompt.find("France is in Europe.").unwrap();
        assert!(first < second);
    }

    #[test]
    fn prompt_joins_chunks_with_blank_lines() {
        let chunks = vec![chunk(0, "alpha"), chunk(1, "beta")];
        let prompt = build_prompt("q", &chunks);
        assert!(prompt.contains("alpha\n\nbeta"));
    }

    #[test]
    fn prompt_with_no_context_is_well_formed() {
        let prompt = build_prompt("q", &[]);
        assert!(prompt.starts_with("Question: q"));
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn parse_chat_response_extracts_content() {
        let json = serde_json::json!({
            "choices": [ { "message": { "role": "assistant", "content": "Paris." } } ]
        });
        assert_eq!(parse_chat_response(&json).unwrap(), "Paris.");
    }

    #[test]
    fn parse_chat_response_rejects_malformed() {
        let json = serde_json::json!({ "choices": [] });
        assert!(parse_chat_response(&json).is_err());
    }
}
