//! # askdoc CLI
//!
//! The `askdoc` binary is the primary interface to the document
//! question-answering backend.
//!
//! ## Usage
//!
//! ```bash
//! askdoc --config ./config/askdoc.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `askdoc init` | Create the SQLite database and run schema migrations |
//! | `askdoc upload <path>` | Extract text from a pdf/docx/txt file and store it |
//! | `askdoc ask <id> "<question>"` | Answer a question about a stored document |
//! | `askdoc get <id>` | Print a stored document's metadata and text |
//! | `askdoc list` | List stored documents |
//! | `askdoc serve` | Start the HTTP API server |
//!
//! ## Examples
//!
//! ```bash
//! # Initialize the database
//! askdoc init --config ./config/askdoc.toml
//!
//! # Upload a document
//! askdoc upload ./notes/report.pdf
//!
//! # Ask about it (requires OPENAI_API_KEY)
//! askdoc ask 3f0b5a1e-... "What are the key findings?"
//!
//! # Start the HTTP API
//! askdoc serve
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use askdoc::{ask, config, get, list, migrate, server, upload};

/// askdoc — a document question-answering backend.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/askdoc.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "askdoc",
    about = "askdoc — upload documents and ask questions about their content",
    version,
    long_about = "askdoc extracts text from uploaded documents (PDF, DOCX, plain text), \
    stores them in SQLite, and answers questions about them with a retrieval-augmented \
    pipeline over external embedding and language-model services."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/askdoc.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the documents table.
    /// This command is idempotent — running it multiple times is safe.
    Init,

    /// Upload a document.
    ///
    /// Extracts the text (by file extension: pdf, docx, or txt) and
    /// stores the raw file plus extracted text. Prints the new
    /// document id.
    Upload {
        /// Path to the file to upload.
        path: PathBuf,
    },

    /// Ask a question about a stored document.
    ///
    /// Chunks the document's text, embeds the chunks, retrieves the most
    /// relevant ones for the question, and asks the configured language
    /// model. Requires `OPENAI_API_KEY`.
    Ask {
        /// Document id (as printed by `upload` or `list`).
        id: String,

        /// The question to answer.
        question: String,
    },

    /// Print a stored document's metadata and extracted text.
    Get {
        /// Document id.
        id: String,
    },

    /// List stored documents, newest first.
    List,

    /// Start the HTTP API server.
    ///
    /// Binds to the address configured in `[server].bind` and exposes
    /// `POST /api/upload`, `POST /api/ask`, and `GET /health`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Upload { path } => {
            upload::run_upload(&cfg, &path).await?;
        }
        Commands::Ask { id, question } => {
            ask::run_ask(&cfg, &id, &question).await?;
        }
        Commands::Get { id } => {
            get::run_get(&cfg, &id).await?;
        }
        Commands::List => {
            list::run_list(&cfg).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
