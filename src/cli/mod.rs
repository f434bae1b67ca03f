//! Command-line interface: argument parsing, logging setup and dispatch.

mod ask;
mod cache;
mod chat;
mod console;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use recallbot::config::Config;
use recallbot::providers::OpenAiProvider;

/// Answers questions from a local answer cache, asking a language model
/// only for questions it has not seen before.
#[derive(Parser, Debug)]
#[command(name = "recallbot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Config file (defaults to ~/.recallbot/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Answer cache CSV file, overriding the configured path
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub(crate) enum Commands {
    /// Start an interactive question/answer session (default)
    Chat,
    /// Answer a single question and exit
    Ask {
        /// The question, matched exactly against the cache
        question: String,
    },
    /// Inspect the answer cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub(crate) enum CacheAction {
    /// Print cached question/answer pairs
    List {
        /// Maximum number of pairs to show
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
        /// Emit CSV in the cache file format instead of readable text
        #[arg(long)]
        csv: bool,
    },
    /// Show cache size and location
    Stats,
}

/// Log line format on stderr.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub(crate) enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Parse arguments and run the selected command.
pub(crate) async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_format);

    let config = load_config(cli.config.as_deref(), cli.cache)?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => chat::cmd_chat(config).await,
        Commands::Ask { question } => ask::cmd_ask(config, &question).await,
        Commands::Cache { action } => cache::cmd_cache(config, action),
    }
}

fn init_logging(verbose: bool, format: LogFormat) {
    let default_directive = if verbose {
        "recallbot=debug"
    } else {
        "recallbot=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn load_config(path: Option<&std::path::Path>, cache_override: Option<PathBuf>) -> Result<Config> {
    let mut config = match path {
        Some(p) => Config::load_from_path(p)
            .with_context(|| format!("Failed to load configuration from {}", p.display()))?,
        None => Config::load().with_context(|| "Failed to load configuration")?,
    };
    if let Some(cache) = cache_override {
        config.cache_path = cache;
    }
    Ok(config)
}

/// Build the generation service from configuration.
pub(crate) fn build_provider(config: &Config) -> Result<OpenAiProvider> {
    OpenAiProvider::from_config(&config.provider, &config.fine_tune)
        .with_context(|| "Failed to set up the generation provider")
}
