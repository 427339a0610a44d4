//! # askdoc
//!
//! A document question-answering backend: upload a document (PDF, DOCX,
//! or plain text), then ask natural-language questions about it and get
//! answers synthesized from its content.
//!
//! The core is a retrieval-augmented generation (RAG) pipeline that
//! orchestrates external services: document text is split into
//! overlapping chunks, the chunks are embedded into a vector space, the
//! most relevant chunks for a question are retrieved, and a hosted
//! language model is prompted with that context to produce the answer.
//!
//! ## Architecture
//!
//! ```text
//! upload ──▶ loader ──▶ store (SQLite)
//!                          │
//! ask ─────────────────────┤
//!                          ▼
//!          chunk ──▶ index (embed) ──▶ top-k ──▶ generate ──▶ answer
//!                      (ephemeral, per request)
//! ```
//!
//! ## Quick start
//!
//! ```bash
//! askdoc init                          # create database
//! askdoc upload report.pdf             # extract text and store
//! askdoc ask <id> "What is covered?"   # RAG answer
//! askdoc serve                         # start HTTP API
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`loader`] | Text extraction (pdf/docx/txt) |
//! | [`store`] | Document persistence |
//! | [`chunk`] | Overlapping text splitter |
//! | [`embedding`] | Embedding service client |
//! | [`index`] | Ephemeral vector index |
//! | [`generate`] | Answer generation via LLM |
//! | [`answer`] | Pipeline orchestration |
//! | [`server`] | HTTP API |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod answer;
pub mod ask;
pub mod chunk;
pub mod config;
pub mod db;
pub mod embedding;
pub mod generate;
pub mod get;
pub mod index;
pub mod list;
pub mod loader;
pub mod migrate;
pub mod models;
pub mod server;
pub mod store;
pub mod upload;
