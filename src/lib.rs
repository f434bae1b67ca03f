//! RecallBot: a question-answering assistant with a persistent answer cache.
//!
//! Questions are answered from a local `Question,Answer` CSV cache when an
//! exact match exists and from a generation service otherwise; generated
//! answers are written back to the cache. Every fifth turn the user may send
//! the whole cache to the service for fine-tuning.

pub mod agent;
pub mod cache;
pub mod config;
pub mod error;
pub mod providers;

pub use agent::{
    run_persistent_session, AnswerSource, Console, FineTuneTrigger, Resolution,
    ResponseResolver, Session, SessionStats,
};
pub use cache::{CacheEntry, CachePersistence, CacheStore, CsvFile};
pub use config::Config;
pub use error::{RecallError, Result};
pub use providers::{GenerationService, OpenAiProvider};
