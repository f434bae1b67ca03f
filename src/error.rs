//! Error types for RecallBot.
//!
//! Every fallible library operation returns [`Result`], whose error is a
//! [`RecallError`]. The session loop decides per variant whether a failure
//! ends startup, ends one turn, or is just reported.

use thiserror::Error;

/// Errors produced by the cache, the generation service and the session loop.
#[derive(Error, Debug)]
pub enum RecallError {
    /// The persisted answer cache is malformed or could not be written.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// The generation service could not produce an answer for a question.
    #[error("Generation error: {0}")]
    Generation(String),

    /// A fine-tuning pass failed; the previous model stays active.
    #[error("Training error: {0}")]
    Training(String),

    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The interactive surface failed to read input.
    #[error("Console error: {0}")]
    Console(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, RecallError>;
