//! Interactive chat command handler.

use anyhow::{Context, Result};

use recallbot::agent::run_persistent_session;
use recallbot::cache::{CachePersistence, CsvFile};
use recallbot::config::Config;
use recallbot::providers::GenerationService;

use super::build_provider;
use super::console::ReadlineConsole;

/// Run a chat session against the configured cache and provider.
pub(crate) async fn cmd_chat(config: Config) -> Result<()> {
    let persistence = CsvFile::new(&config.cache_path);
    let provider = build_provider(&config)?;
    let mut console = ReadlineConsole::new(&config.quit_word)?;

    println!(
        "RecallBot v{} ({} / {})",
        env!("CARGO_PKG_VERSION"),
        provider.name(),
        provider.model()
    );
    println!("Answer cache: {}", persistence.location());
    println!();

    let stats = run_persistent_session(&persistence, Box::new(provider), &mut console)
        .await
        .with_context(|| {
            format!(
                "Chat session failed (answer cache: {})",
                persistence.location()
            )
        })?;

    println!("Goodbye! {}", stats);
    Ok(())
}
