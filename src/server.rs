//! HTTP API server.
//!
//! Exposes the upload and ask operations over JSON HTTP.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/upload` | Multipart upload of a pdf/docx/txt document |
//! | `POST` | `/api/ask` | Ask a question about a stored document |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Response envelope
//!
//! Both operations report outcomes through a uniform envelope:
//!
//! ```json
//! { "status": 1, "message": "Document uploaded successfully", "details": { ... } }
//! ```
//!
//! `status` is `1` on success and `0` on failure; `message` is
//! human-readable; `details` carries the operation payload. Loader and
//! store failures map to 400/404; external-service failures (embedding,
//! generation) map to 502 with the underlying message embedded. Nothing
//! in the pipeline is retried at this layer.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support browser
//! clients.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::answer::answer_question;
use crate::config::Config;
use crate::db;
use crate::loader::{self, LoadError};
use crate::store;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    pool: SqlitePool,
}

/// Starts the HTTP server on the address configured in `[server].bind`.
/// Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let pool = db::connect(config).await?;

    let state = AppState {
        config: Arc::new(config.clone()),
        pool,
    };

    let app = router(state);

    println!("askdoc server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/upload", post(handle_upload))
        .route("/api/ask", post(handle_ask))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

// ============ Response envelope ============

/// Uniform response body for `/api/upload` and `/api/ask`.
#[derive(Debug, Serialize)]
struct Envelope {
    /// `1` on success, `0` on failure.
    status: u8,
    message: String,
    details: serde_json::Value,
}

fn success(message: impl Into<String>, details: serde_json::Value) -> Envelope {
    Envelope {
        status: 1,
        message: message.into(),
        details,
    }
}

fn failure(message: impl Into<String>) -> Envelope {
    Envelope {
        status: 0,
        message: message.into(),
        details: serde_json::json!({}),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /api/upload ============

/// Multipart upload handler. Expects a `file` part with a filename;
/// extracts text according to the extension and persists the document.
async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> (StatusCode, Json<Envelope>) {
    // Find the file part
    let mut upload: Option<(String, Vec<u8>)> = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() == Some("file") {
                    let filename = match field.file_name() {
                        Some(name) => name.to_string(),
                        None => continue,
                    };
                    match field.bytes().await {
                        Ok(bytes) => {
                            upload = Some((filename, bytes.to_vec()));
                            break;
                        }
                        Err(e) => {
                            return (
                                StatusCode::BAD_REQUEST,
                                Json(failure(format!("Failed to read upload: {}", e))),
                            )
                        }
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(failure(format!("Invalid multipart request: {}", e))),
                )
            }
        }
    }

    let (filename, bytes) = match upload {
        Some(parts) => parts,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(failure("No file provided")),
            )
        }
    };

    let format = match loader::format_tag(&filename) {
        Some(tag) => tag,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(failure(format!("Unsupported file type: '{}'", filename))),
            )
        }
    };

    let body = match loader::extract_text(&bytes, &format) {
        Ok(body) => body,
        Err(e) => return load_error_response(e),
    };

    match store::save_document(&state.pool, &filename, &format, &bytes, &body).await {
        Ok(doc) => (
            StatusCode::CREATED,
            Json(success(
                "Document uploaded successfully",
                serde_json::json!({
                    "id": doc.id,
                    "name": doc.name,
                    "format": doc.format,
                    "created_at": doc.created_at,
                }),
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(failure(format!("Failed to store document: {}", e))),
        ),
    }
}

/// Maps a loader failure to an envelope. All extraction failures are
/// client errors: the bytes did not match the declared format.
fn load_error_response(err: LoadError) -> (StatusCode, Json<Envelope>) {
    let message = match &err {
        LoadError::UnsupportedFormat(tag) => format!("Unsupported file type: {}", tag),
        LoadError::Decode(_) => "File must be a text document".to_string(),
        other => other.to_string(),
    };
    (StatusCode::BAD_REQUEST, Json(failure(message)))
}

// ============ POST /api/ask ============

/// JSON ask handler. The body must carry `document_id` and `question`;
/// fields are checked by hand so validation failures use the same
/// envelope as every other outcome.
async fn handle_ask(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<Envelope>) {
    let document_id = body.get("document_id").and_then(|v| v.as_str());
    let question = body.get("question").and_then(|v| v.as_str());

    let (document_id, question) = match (document_id, question) {
        (Some(id), Some(q)) if !q.trim().is_empty() => (id, q),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(failure("document_id and question are required")),
            )
        }
    };

    match answer_question(&state.config, &state.pool, document_id, question).await {
        Ok(response) => (
            StatusCode::OK,
            Json(success(
                "Question answered successfully",
                serde_json::json!({
                    "question": response.question,
                    "answer": response.answer,
                    "document_name": response.document_name,
                }),
            )),
        ),
        Err(e) => {
            let (status, message) = classify_ask_error(&e);
            (status, Json(failure(message)))
        }
    }
}

/// Maps pipeline failures to status codes by message: store misses are
/// 404, external-service failures (embedding, generation) are 502 with
/// the underlying message embedded, anything else is 500.
fn classify_ask_error(err: &anyhow::Error) -> (StatusCode, String) {
    let msg = err.to_string();

    if msg.contains("not found") {
        (StatusCode::NOT_FOUND, "Document not found".to_string())
    } else if msg.contains("embedding service") || msg.contains("generation") {
        (
            StatusCode::BAD_GATEWAY,
            format!("Error processing question: {}", msg),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error processing question: {}", msg),
        )
    }
}
