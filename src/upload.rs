//! Document upload from the command line.
//!
//! Reads a file from disk, extracts its text via the loader, and persists
//! it. The same loader + store path backs `POST /api/upload`.

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::config::Config;
use crate::db;
use crate::loader;
use crate::store;

pub async fn run_upload(config: &Config, path: &Path) -> Result<()> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
        .with_context(|| format!("Invalid file path: {}", path.display()))?;

    let format = match loader::format_tag(&name) {
        Some(tag) => tag,
        None => bail!("unsupported file type: no extension on '{}'", name),
    };

    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let body = loader::extract_text(&bytes, &format)?;

    let pool = db::connect(config).await?;
    let doc = store::save_document(&pool, &name, &format, &bytes, &body).await?;
    pool.close().await;

    println!("Document uploaded successfully.");
    println!("  id: {}", doc.id);
    println!("  name: {}", doc.name);
    println!("  format: {}", doc.format);
    println!("  extracted characters: {}", doc.body.chars().count());
    Ok(())
}
