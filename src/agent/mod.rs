//! Question resolution core: cache-first resolver, fine-tune trigger and the
//! session loop that drives them.

pub mod fine_tune;
pub mod resolver;
pub mod session;

pub use fine_tune::{FineTuneTrigger, TriggerState, FINE_TUNE_INTERVAL};
pub use resolver::{AnswerSource, Resolution, ResponseResolver};
pub use session::{run_persistent_session, Console, Session, SessionStats, FINE_TUNE_PROMPT};
