//! The conversational session loop.
//!
//! One session owns the [`CacheStore`] and the generation service for its
//! whole lifetime. Turns run strictly one after another: read a question,
//! resolve it, then offer a fine-tune on every fifth turn. Per-turn failures
//! are reported and the loop carries on; only a console failure ends the
//! loop early, and even then the cache is still saved by
//! [`run_persistent_session`].

use std::fmt;

use tracing::{info, warn};

use crate::cache::{CachePersistence, CacheStore};
use crate::error::Result;
use crate::providers::GenerationService;

use super::fine_tune::{FineTuneTrigger, TriggerState};
use super::resolver::{Resolution, ResponseResolver};

/// Question asked when the fine-tune trigger fires.
pub const FINE_TUNE_PROMPT: &str = "Do you want to add new data to the training dataset? (Y/N) ";

/// Interactive surface the session talks to.
///
/// Implementations filter the end-of-session sentinel themselves:
/// [`read_question`](Self::read_question) returns `Ok(None)` instead of
/// passing it on.
pub trait Console {
    /// Next raw question, or `None` when the session should end.
    fn read_question(&mut self) -> Result<Option<String>>;

    /// Yes/no confirmation.
    fn confirm(&mut self, prompt: &str) -> Result<bool>;

    fn show_answer(&mut self, resolution: &Resolution);

    fn notice(&mut self, message: &str);

    fn report_failure(&mut self, message: &str);
}

/// Per-session counters. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub turns: u64,
    pub cache_hits: u64,
    pub generated: u64,
    pub failed_turns: u64,
    pub fine_tunes: u64,
    pub fine_tune_failures: u64,
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} turn(s): {} from cache, {} generated, {} failed",
            self.turns, self.cache_hits, self.generated, self.failed_turns
        )?;
        if self.fine_tunes > 0 || self.fine_tune_failures > 0 {
            write!(
                f,
                "; {} fine-tune(s), {} failed",
                self.fine_tunes, self.fine_tune_failures
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopAction {
    Continue,
    Exit,
}

/// A running conversation: cache, generation service and turn bookkeeping.
pub struct Session {
    store: CacheStore,
    service: Box<dyn GenerationService>,
    resolver: ResponseResolver,
    trigger: FineTuneTrigger,
    stats: SessionStats,
}

impl Session {
    pub fn new(store: CacheStore, service: Box<dyn GenerationService>) -> Self {
        Self {
            store,
            service,
            resolver: ResponseResolver::new(),
            trigger: FineTuneTrigger::new(),
            stats: SessionStats::default(),
        }
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Resolve one question and count it as a turn.
    ///
    /// Returns the resolution plus whether the fine-tune trigger fired.
    pub async fn ask(&mut self, question: &str) -> (Result<Resolution>, TriggerState) {
        let result = self
            .resolver
            .resolve(question, &mut self.store, self.service.as_ref())
            .await;

        self.stats.turns += 1;
        match &result {
            Ok(r) if r.is_cache_hit() => self.stats.cache_hits += 1,
            Ok(_) => self.stats.generated += 1,
            Err(_) => self.stats.failed_turns += 1,
        }
        (result, self.trigger.record_turn())
    }

    /// Submit the whole cache for fine-tuning. Failures are counted and
    /// returned; the cache is never modified.
    pub async fn fine_tune(&mut self) -> Result<()> {
        let result = self
            .trigger
            .submit(&self.store, self.service.as_mut())
            .await;
        match result {
            Ok(()) => self.stats.fine_tunes += 1,
            Err(_) => self.stats.fine_tune_failures += 1,
        }
        result
    }

    /// Run turns until the console signals the end of the session.
    pub async fn run(&mut self, console: &mut dyn Console) -> SessionStats {
        loop {
            let question = match console.read_question() {
                Ok(Some(q)) => q,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Console failed; ending session");
                    console.report_failure(&e.to_string());
                    break;
                }
            };

            if self.turn(&question, console).await == LoopAction::Exit {
                break;
            }
        }

        info!(
            turns = self.stats.turns,
            cache_hits = self.stats.cache_hits,
            generated = self.stats.generated,
            failed = self.stats.failed_turns,
            "Session ended"
        );
        self.stats
    }

    async fn turn(&mut self, question: &str, console: &mut dyn Console) -> LoopAction {
        let (result, state) = self.ask(question).await;
        match result {
            Ok(resolution) => console.show_answer(&resolution),
            Err(e) => console.report_failure(&format!("Could not answer that question: {}", e)),
        }

        if state != TriggerState::Fired {
            return LoopAction::Continue;
        }

        match console.confirm(FINE_TUNE_PROMPT) {
            Ok(true) => {
                console.notice(&format!(
                    "Fine-tuning on {} cached answer(s), this may take a while...",
                    self.store.len()
                ));
                match self.fine_tune().await {
                    Ok(()) => console.notice(&format!(
                        "Model is fine-tuned with stored questions and answers (now using {})",
                        self.service.model()
                    )),
                    Err(e) => console.report_failure(&format!(
                        "Fine-tuning failed, continuing with the previous model: {}",
                        e
                    )),
                }
                LoopAction::Continue
            }
            Ok(false) => LoopAction::Continue,
            Err(e) => {
                warn!(error = %e, "Console failed during confirmation; ending session");
                console.report_failure(&e.to_string());
                LoopAction::Exit
            }
        }
    }

    pub fn into_store(self) -> CacheStore {
        self.store
    }
}

/// Load the cache, run a session, and save the cache once at the end.
///
/// A malformed cache aborts before any turn runs so the file is never
/// overwritten with a guessed-empty store.
pub async fn run_persistent_session(
    persistence: &dyn CachePersistence,
    service: Box<dyn GenerationService>,
    console: &mut dyn Console,
) -> Result<SessionStats> {
    let store = CacheStore::load(persistence)?;
    info!(
        location = %persistence.location(),
        entries = store.len(),
        provider = service.name(),
        model = %service.model(),
        "Session starting"
    );

    let mut session = Session::new(store, service);
    let stats = session.run(console).await;
    session.into_store().save(persistence)?;
    Ok(stats)
}
