//! Session bookkeeping: mode state machine, counters, prediction, sentence
//! and status line, plus the user intents that drive them.

pub mod intents;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use intents::{
    apply_intent, begin_training, finish_training, train, Intent, IntentOutcome, STATUS_TRAINING,
    STATUS_TRAINING_FAILED,
};
pub use state::{
    lock_state, new_shared_state, Mode, Prediction, SessionError, SessionState, SharedState,
    Snapshot,
};
