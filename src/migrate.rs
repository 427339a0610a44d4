use anyhow::Result;

use crate::config::Config;
use crate::db;

/// Create the `documents` table and its indexes. Idempotent.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            format TEXT NOT NULL,
            file BLOB NOT NULL,
            body TEXT NOT NULL,
            dedup_hash TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_documents_created_at ON documents(created_at DESC)",
    )
    .execute(&pool)
    .await?;

    pool.close().await;
    Ok(())
}
