//! Cache inspection command handlers.

use anyhow::{Context, Result};

use recallbot::cache::{write_csv, CachePersistence, CacheStore, CsvFile};
use recallbot::config::Config;

use super::CacheAction;

/// Handle `recallbot cache` subcommands.
pub(crate) fn cmd_cache(config: Config, action: CacheAction) -> Result<()> {
    let persistence = CsvFile::new(&config.cache_path);
    let store = CacheStore::load(&persistence).with_context(|| "Failed to load answer cache")?;

    match action {
        CacheAction::List { limit, csv } => {
            let pairs = sorted_pairs(&store, limit);
            if csv {
                write_csv(std::io::stdout().lock(), pairs)?;
                return Ok(());
            }

            if pairs.is_empty() {
                println!("Answer cache is empty.");
                return Ok(());
            }
            println!("Showing {} of {} cached answer(s):", pairs.len(), store.len());
            for (question, answer) in pairs {
                println!();
                println!("Q: {}", question);
                println!("A: {}", answer);
            }
        }
        CacheAction::Stats => {
            let bytes: usize = store.iter().map(|(q, a)| q.len() + a.len()).sum();
            println!("Location: {}", persistence.location());
            println!("Entries:  {}", store.len());
            println!("Text:     {} bytes", bytes);
        }
    }

    Ok(())
}

/// Pairs ordered by question, at most `limit` of them.
fn sorted_pairs(store: &CacheStore, limit: usize) -> Vec<(&str, &str)> {
    let mut pairs: Vec<_> = store.iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    pairs.truncate(limit);
    pairs
}
