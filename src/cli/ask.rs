//! One-shot ask command handler.

use anyhow::{Context, Result};
use tracing::debug;

use recallbot::agent::Session;
use recallbot::cache::{CacheStore, CsvFile};
use recallbot::config::Config;

use super::build_provider;

/// Answer one question, printing the answer to stdout.
///
/// Cache hits are answered without building a provider, so no API key is
/// needed for them. The cache is only rewritten when a new answer was
/// generated.
pub(crate) async fn cmd_ask(config: Config, question: &str) -> Result<()> {
    let answer = ask_answer(&config, question).await?;
    println!("{}", answer);
    Ok(())
}

async fn ask_answer(config: &Config, question: &str) -> Result<String> {
    let persistence = CsvFile::new(&config.cache_path);
    let store = CacheStore::load(&persistence).with_context(|| "Failed to load answer cache")?;

    if let Some(answer) = store.get(question) {
        debug!(source = "cache", "Answered");
        return Ok(answer.to_string());
    }

    let provider = build_provider(config)?;
    let mut session = Session::new(store, Box::new(provider));
    let (result, _) = session.ask(question).await;
    let resolution = result.with_context(|| "Could not answer the question")?;
    debug!(source = resolution.source.label(), "Answered");

    session
        .into_store()
        .save(&persistence)
        .with_context(|| "Failed to save answer cache")?;
    Ok(resolution.answer)
}
