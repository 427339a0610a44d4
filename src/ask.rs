//! Ask a question about a stored document from the command line.

use anyhow::{bail, Result};

use crate::answer::answer_question;
use crate::config::Config;
use crate::db;

pub async fn run_ask(config: &Config, document_id: &str, question: &str) -> Result<()> {
    if question.trim().is_empty() {
        bail!("question must not be empty");
    }

    let pool = db::connect(config).await?;
    let result = answer_question(config, &pool, document_id, question).await;
    pool.close().await;
    let response = result?;

    println!("document: {}", response.document_name);
    println!("question: {}", response.question);
    println!();
    println!("{}", response.answer);
    Ok(())
}
