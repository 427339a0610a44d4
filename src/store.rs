//! Document persistence.
//!
//! Documents are stored durably in SQLite: raw file bytes, extracted text,
//! display name, and upload timestamp, keyed by a UUID. There is no update
//! or delete operation; extracted text is immutable once stored.

use anyhow::{bail, Result};
use chrono::Utc;
use sha2::{Digest, Sha256};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::models::{Document, DocumentSummary};

/// Persist a new document and return the stored record.
pub async fn save_document(
    pool: &SqlitePool,
    name: &str,
    format: &str,
    file: &[u8],
    body: &str,
) -> Result<Document> {
    let mut hasher = Sha256::new();
    hasher.update(file);
    let dedup_hash = format!("{:x}", hasher.finalize());

    let doc = Document {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        format: format.to_string(),
        file: file.to_vec(),
        body: body.to_string(),
        dedup_hash,
        created_at: Utc::now().timestamp(),
    };

    sqlx::query(
        r#"
        INSERT INTO documents (id, name, format, file, body, dedup_hash, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&doc.id)
    .bind(&doc.name)
    .bind(&doc.format)
    .bind(&doc.file)
    .bind(&doc.body)
    .bind(&doc.dedup_hash)
    .bind(doc.created_at)
    .execute(pool)
    .await?;

    Ok(doc)
}

/// Fetch a document by id. Fails with `document not found: {id}` for
/// unknown ids; callers at the request boundary classify that message
/// into a 404 envelope.
pub async fn get_document(pool: &SqlitePool, id: &str) -> Result<Document> {
    let row = sqlx::query(
        "SELECT id, name, format, file, body, dedup_hash, created_at FROM documents WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let row = match row {
        Some(row) => row,
        None => bail!("document not found: {}", id),
    };

    Ok(Document {
        id: row.get("id"),
        name: row.get("name"),
        format: row.get("format"),
        file: row.get("file"),
        body: row.get("body"),
        dedup_hash: row.get("dedup_hash"),
        created_at: row.get("created_at"),
    })
}

/// List stored documents, newest first.
pub async fn list_documents(pool: &SqlitePool) -> Result<Vec<DocumentSummary>> {
    let rows = sqlx::query(
        "SELECT id, name, format, created_at FROM documents ORDER BY created_at DESC, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| DocumentSummary {
            id: row.get("id"),
            name: row.get("name"),
            format: row.get("format"),
            created_at: row.get("created_at"),
        })
        .collect())
}
