use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

/// Splitter settings. The answer pipeline reads these; nothing hardcodes
/// a (chunk_size, overlap) pair.
#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks. Must be < chunk_size.
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
        }
    }
}

fn default_chunk_size() -> usize {
    1000
}
fn default_overlap() -> usize {
    200
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    /// Number of chunks retrieved as context for each question.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    4
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_provider")]
    pub provider: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            model: default_embedding_model(),
            batch_size: default_batch_size(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_embedding_provider() -> String {
    "openai".to_string()
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}
fn default_batch_size() -> usize {
    64
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    #[serde(default = "default_generation_provider")]
    pub provider: String,
    #[serde(default = "default_generation_model")]
    pub model: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_generation_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_generation_provider(),
            model: default_generation_model(),
            max_retries: default_max_retries(),
            timeout_secs: default_generation_timeout_secs(),
        }
    }
}

fn default_generation_provider() -> String {
    "openai".to_string()
}
fn default_generation_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_generation_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.chunking.chunk_size == 0 {
        anyhow::bail!("chunking.chunk_size must be > 0");
    }
    if config.chunking.overlap >= config.chunking.chunk_size {
        anyhow::bail!(
            "chunking.overlap ({}) must be smaller than chunking.chunk_size ({})",
            config.chunking.overlap,
            config.chunking.chunk_size
        );
    }
    if config.retrieval.top_k == 0 {
        anyhow::bail!("retrieval.top_k must be >= 1");
    }

    match config.embedding.provider.as_str() {
        "openai" => {}
        other => anyhow::bail!("Unknown embedding provider: '{}'. Must be openai.", other),
    }
    match config.generation.provider.as_str() {
        "openai" => {}
        other => anyhow::bail!("Unknown generation provider: '{}'. Must be openai.", other),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> Result<Config> {
        let config: Config = toml::from_str(toml_str)?;
        validate(&config)?;
        Ok(config)
    }

    const MINIMAL: &str = r#"
[db]
path = "data/askdoc.sqlite"

[server]
bind = "127.0.0.1:8080"
"#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = parse(MINIMAL).unwrap();
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.overlap, 200);
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.embedding.model, "text-embedding-3-small");
        assert_eq!(config.generation.model, "gpt-4o-mini");
    }

    #[test]
    fn overlap_must_be_smaller_than_chunk_size() {
        let toml_str = format!(
            "{}\n[chunking]\nchunk_size = 100\noverlap = 100\n",
            MINIMAL
        );
        assert!(parse(&toml_str).is_err());
    }

    #[test]
    fn zero_chunk_size_rejected() {
        let toml_str = format!("{}\n[chunking]\nchunk_size = 0\n", MINIMAL);
        assert!(parse(&toml_str).is_err());
    }

    #[test]
    fn unknown_provider_rejected() {
        let toml_str = format!("{}\n[embedding]\nprovider = \"cohere\"\n", MINIMAL);
        assert!(parse(&toml_str).is_err());
    }
}
