//! Periodic fine-tuning trigger.
//!
//! Counts resolved turns and fires on every multiple of
//! [`FINE_TUNE_INTERVAL`]. Firing only means "ask the user"; the session
//! decides whether to call [`FineTuneTrigger::submit`]. Each submission
//! sends the whole cache, including pairs trained on in earlier rounds.

use std::time::Instant;

use tracing::{info, warn};

use crate::cache::CacheStore;
use crate::error::Result;
use crate::providers::GenerationService;

/// Number of turns between fine-tune offers.
pub const FINE_TUNE_INTERVAL: u64 = 5;

/// Outcome of recording a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Armed,
    Fired,
}

/// Turn counter plus firing rule.
#[derive(Debug, Clone)]
pub struct FineTuneTrigger {
    turns: u64,
    interval: u64,
}

impl Default for FineTuneTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl FineTuneTrigger {
    pub fn new() -> Self {
        Self {
            turns: 0,
            interval: FINE_TUNE_INTERVAL,
        }
    }

    /// Turns recorded so far this session.
    pub fn turns(&self) -> u64 {
        self.turns
    }

    /// Record one resolved turn and report whether the trigger fired.
    pub fn record_turn(&mut self) -> TriggerState {
        self.turns += 1;
        if self.turns % self.interval == 0 {
            TriggerState::Fired
        } else {
            TriggerState::Armed
        }
    }

    /// Train `service` on every pair currently in `store`.
    ///
    /// Blocks until the service finishes. `store` is only read, so a failed
    /// pass never needs rolling back.
    pub async fn submit(
        &self,
        store: &CacheStore,
        service: &mut dyn GenerationService,
    ) -> Result<()> {
        let pairs = store.snapshot();
        let started = Instant::now();
        info!(
            pairs = pairs.len(),
            turn = self.turns,
            model = %service.model(),
            "Submitting cache for fine-tuning"
        );

        match service.fine_tune(&pairs).await {
            Ok(()) => {
                info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    model = %service.model(),
                    "Fine-tuning finished"
                );
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Fine-tuning failed; keeping previous model");
                Err(e)
            }
        }
    }
}
