//! In-memory question → answer store.
//!
//! Keys are matched byte-for-byte: case, whitespace and punctuation all
//! count. There is no eviction, expiry or size bound; the store lives for
//! the whole session and is written back once at the end.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

use super::persistence::CachePersistence;

/// One cached question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub question: String,
    pub answer: String,
}

impl CacheEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Mapping from question text to answer text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStore {
    entries: HashMap<String, String>,
}

impl CacheStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate a store from persisted storage.
    ///
    /// A missing source yields an empty store; a malformed one is a
    /// [`RecallError::Persistence`](crate::error::RecallError::Persistence).
    pub fn load(source: &dyn CachePersistence) -> Result<Self> {
        let entries = source.load()?;
        debug!(
            location = %source.location(),
            entries = entries.len(),
            "Loaded answer cache"
        );
        Ok(Self { entries })
    }

    /// Write every entry to `destination`, replacing its previous contents.
    pub fn save(&self, destination: &dyn CachePersistence) -> Result<()> {
        destination.save(self)?;
        debug!(
            location = %destination.location(),
            entries = self.entries.len(),
            "Saved answer cache"
        );
        Ok(())
    }

    /// Exact-match lookup.
    pub fn get(&self, question: &str) -> Option<&str> {
        self.entries.get(question).map(String::as_str)
    }

    /// Insert or overwrite the answer for `question`.
    pub fn put(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.entries.insert(question.into(), answer.into());
    }

    pub fn contains(&self, question: &str) -> bool {
        self.entries.contains_key(question)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(question, answer)` pairs in the map's iteration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(q, a)| (q.as_str(), a.as_str()))
    }

    /// Owned copy of every pair, used as a fine-tuning payload.
    pub fn snapshot(&self) -> Vec<CacheEntry> {
        self.iter().map(|(q, a)| CacheEntry::new(q, a)).collect()
    }
}

impl FromIterator<(String, String)> for CacheStore {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
