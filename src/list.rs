//! List stored documents.

use anyhow::Result;
use chrono::DateTime;

use crate::config::Config;
use crate::db;
use crate::store;

pub async fn run_list(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    let result = store::list_documents(&pool).await;
    pool.close().await;
    let docs = result?;

    if docs.is_empty() {
        println!("No documents.");
        return Ok(());
    }

    println!("{} document(s):", docs.len());
    for doc in docs {
        let uploaded = DateTime::from_timestamp(doc.created_at, 0)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| doc.created_at.to_string());
        println!("  {}  {:<6} {}  {}", doc.id, doc.format, uploaded, doc.name);
    }
    Ok(())
}
