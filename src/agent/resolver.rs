//! Cache-first response resolution.
//!
//! A question is answered from the [`CacheStore`] when an exact match
//! exists; otherwise the generation service is asked and the answer is
//! written back. Hits never touch the service or the store.

use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::error::Result;
use crate::providers::GenerationService;

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    Cache,
    Generated,
}

impl AnswerSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Generated => "generated",
        }
    }
}

/// A resolved answer and its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub answer: String,
    pub source: AnswerSource,
}

impl Resolution {
    pub fn is_cache_hit(&self) -> bool {
        self.source == AnswerSource::Cache
    }
}

/// Resolves questions against a cache, falling back to generation.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseResolver;

impl ResponseResolver {
    pub fn new() -> Self {
        Self
    }

    /// Answer `question`, from cache if possible.
    ///
    /// On a miss the generated answer is stored before returning. A
    /// generation failure leaves `store` untouched and is returned as-is.
    pub async fn resolve(
        &self,
        question: &str,
        store: &mut CacheStore,
        service: &dyn GenerationService,
    ) -> Result<Resolution> {
        if let Some(answer) = store.get(question) {
            debug!(question_len = question.len(), "Cache hit");
            return Ok(Resolution {
                answer: answer.to_string(),
                source: AnswerSource::Cache,
            });
        }

        debug!(
            question_len = question.len(),
            provider = service.name(),
            "Cache miss, generating"
        );
        let answer = service.complete(question).await.map_err(|e| {
            warn!(error = %e, "Generation failed; cache not updated");
            e
        })?;

        store.put(question, answer.clone());
        Ok(Resolution {
            answer,
            source: AnswerSource::Generated,
        })
    }
}
