//! Generation service abstraction and concrete providers.
//!
//! The resolver and the fine-tune trigger only ever see [`GenerationService`]:
//! one stateful object that answers questions and can be trained on
//! question/answer pairs. Token framing, HTTP transport and job polling are
//! provider concerns.

pub mod openai;

use async_trait::async_trait;
use serde_json::Value;

use crate::cache::CacheEntry;
use crate::error::Result;

pub use openai::OpenAiProvider;

/// A text generation service with a mutable trained state.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Produce an answer for a single question.
    ///
    /// Fails with [`RecallError::Generation`](crate::error::RecallError::Generation)
    /// when no answer can be extracted.
    async fn complete(&self, question: &str) -> Result<String>;

    /// Run a training pass over `pairs`, updating the model used by later
    /// [`complete`](Self::complete) calls.
    ///
    /// Fails with [`RecallError::Training`](crate::error::RecallError::Training);
    /// on failure the previous model state must remain active.
    async fn fine_tune(&mut self, pairs: &[CacheEntry]) -> Result<()>;

    /// Short provider identifier for logs.
    fn name(&self) -> &'static str;

    /// Model currently answering questions.
    fn model(&self) -> String;
}

/// Build a readable error message from a non-success HTTP response.
///
/// OpenAI-style APIs put the useful text under `error.message`; anything
/// else is passed through as-is.
pub fn describe_http_error(provider: &str, status: u16, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.trim().to_string());
    if detail.is_empty() {
        format!("{} API returned HTTP {}", provider, status)
    } else {
        format!("{} API returned HTTP {}: {}", provider, status, detail)
    }
}
