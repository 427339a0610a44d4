//! SQLite connection handling for the document database.
//!
//! askdoc's persistence is a single `documents` table, so the pool stays
//! small; WAL mode lets ask requests read while an upload writes, and
//! the busy timeout covers the brief write lock an upload takes.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use crate::config::Config;

/// Open the database configured in `[db]`, creating the file and any
/// missing parent directories on first use.
pub async fn connect(config: &Config) -> Result<SqlitePool> {
    let db_path = &config.db.path;

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!(
                "Failed to create database directory: {}",
                parent.display()
            )
        })?;
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DbConfig, ServerConfig};
    use std::path::PathBuf;

    fn config_with_db_path(path: PathBuf) -> Config {
        Config {
            db: DbConfig { path },
            chunking: Default::default(),
            retrieval: Default::default(),
            embedding: Default::default(),
            generation: Default::default(),
            server: ServerConfig {
                bind: "127.0.0.1:0".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn connect_creates_missing_parent_directories() {
        let tmp = tempfile::TempDir::new().unwrap();
        let db_path = tmp.path().join("nested").join("data").join("askdoc.sqlite");
        let config = config_with_db_path(db_path.clone());

        let pool = connect(&config).await.unwrap();
        assert!(db_path.exists());
        pool.close().await;
    }

    #[tokio::test]
    async fn connect_is_reusable_for_existing_database() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = config_with_db_path(tmp.path().join("askdoc.sqlite"));

        let first = connect(&config).await.unwrap();
        first.close().await;
        let second = connect(&config).await.unwrap();
        second.close().await;
    }
}
