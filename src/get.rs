//! Document inspection by id.
//!
//! Fetches a stored document and prints its metadata and extracted text.

use anyhow::Result;
use chrono::DateTime;

use crate::config::Config;
use crate::db;
use crate::store;

pub async fn run_get(config: &Config, id: &str) -> Result<()> {
    let pool = db::connect(config).await?;
    let result = store::get_document(&pool, id).await;
    pool.close().await;
    let doc = result?;

    let uploaded = DateTime::from_timestamp(doc.created_at, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| doc.created_at.to_string());

    println!("id: {}", doc.id);
    println!("name: {}", doc.name);
    println!("format: {}", doc.format);
    println!("uploaded: {}", uploaded);
    println!("file bytes: {}", doc.file.len());
    println!("hash: {}", doc.dedup_hash);
    println!();
    println!("{}", doc.body);
    Ok(())
}
