//! Configuration for RecallBot.
//!
//! Loaded from `~/.recallbot/config.json`. Every field has a default, so a
//! missing file is not an error. Environment variables override file values:
//!
//! - `RECALLBOT_CACHE_PATH`
//! - `RECALLBOT_MODEL`
//! - `RECALLBOT_API_BASE`
//! - `RECALLBOT_API_KEY` (falls back to `OPENAI_API_KEY` at provider build time)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RecallError, Result};

/// Directory under `$HOME` holding config and the default cache file.
const CONFIG_DIR: &str = ".recallbot";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Location of the persisted `Question,Answer` CSV file.
    pub cache_path: PathBuf,
    /// Input that ends the interactive session.
    pub quit_word: String,
    pub provider: ProviderConfig,
    pub fine_tune: FineTuneConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_path: Self::dir().join("answers.csv"),
            quit_word: "q".to_string(),
            provider: ProviderConfig::default(),
            fine_tune: FineTuneConfig::default(),
        }
    }
}

/// Generation provider settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of an OpenAI-compatible API.
    pub api_base: String,
    pub api_key: Option<String>,
    /// Model used for answers and as the base for fine-tuning.
    pub model: String,
    pub system_prompt: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// HTTP request timeout.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini-2024-07-18".to_string(),
            system_prompt: None,
            temperature: 0.7,
            max_tokens: 1000,
            timeout_secs: 120,
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("system_prompt", &self.system_prompt)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Remote fine-tuning job settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FineTuneConfig {
    /// Seconds between job status polls.
    pub poll_interval_secs: u64,
    /// Give up waiting for a job after this many seconds.
    pub max_wait_secs: u64,
    /// Refuse to start a job with fewer cached pairs than this.
    pub min_examples: usize,
    /// Suffix attached to fine-tuned model names. Empty disables it.
    pub suffix: String,
}

impl Default for FineTuneConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 15,
            max_wait_secs: 3600,
            min_examples: 10,
            suffix: "recallbot".to_string(),
        }
    }
}

impl Config {
    /// `~/.recallbot`, or `./.recallbot` when no home directory is known.
    pub fn dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR)
    }

    /// Default config file path.
    pub fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Load from the default path with environment overrides applied.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::path())
    }

    /// Load from `path` with environment overrides applied. A missing file
    /// yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(data) => serde_json::from_str::<Config>(&data).map_err(|e| {
                RecallError::Config(format!("invalid config file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                Config::default()
            }
            Err(e) => {
                return Err(RecallError::Config(format!(
                    "failed to read config file {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup. Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(path) = get("RECALLBOT_CACHE_PATH") {
            self.cache_path = PathBuf::from(path);
        }
        if let Some(model) = get("RECALLBOT_MODEL") {
            self.provider.model = model;
        }
        if let Some(base) = get("RECALLBOT_API_BASE") {
            self.provider.api_base = base;
        }
        if let Some(key) = get("RECALLBOT_API_KEY") {
            self.provider.api_key = Some(key);
        }
    }

    /// Reject values the session cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.quit_word.is_empty() {
            return Err(RecallError::Config("quit_word must not be empty".into()));
        }
        if self.provider.api_base.trim().is_empty() {
            return Err(RecallError::Config(
                "provider.api_base must not be empty".into(),
            ));
        }
        if self.provider.model.trim().is_empty() {
            return Err(RecallError::Config("provider.model must not be empty".into()));
        }
        if self.provider.timeout_secs == 0 {
            return Err(RecallError::Config(
                "provider.timeout_secs must be greater than 0".into(),
            ));
        }
        if self.fine_tune.poll_interval_secs == 0 {
            return Err(RecallError::Config(
                "fine_tune.poll_interval_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
