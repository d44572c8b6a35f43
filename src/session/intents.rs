//! User intents relayed by the presentation layer.
//!
//! Everything except training is a short, synchronous edit of
//! [`SessionState`].  Training awaits the remote service; its outcome is
//! reported through the status line and never fails the caller.

use crate::remote::RemoteClient;

use super::state::{lock_state, Mode, SessionError, SharedState};

/// Status while a training request is in flight.
pub const STATUS_TRAINING: &str = "Training...";
/// Status after a training request failed.
pub const STATUS_TRAINING_FAILED: &str = "Training Failed. Check Console.";

// ---------------------------------------------------------------------------
// Intent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// The collect button: idle/predict → collect, collect → idle.
    ToggleCollect,
    /// Enter predict mode.
    StartPredict,
    /// Return to idle from any mode.
    Stop,
    /// Replace the label being taught (rejected while collecting).
    SetLabel(String),
    /// Retrain the remote model on every sample collected so far.
    Train,
    /// Append the current prediction and a space to the sentence.
    AddWord,
    /// Replace the sentence with user-edited text.
    SetSentence(String),
    ClearSentence,
    /// Hand the sentence to the presentation for speech playback.
    Speak,
}

/// Result of an applied intent.
#[derive(Debug, Clone, PartialEq)]
pub enum IntentOutcome {
    Applied,
    Trained { accuracy: f64 },
    TrainingFailed,
    /// Text the presentation should speak.
    Speak(String),
}

// ---------------------------------------------------------------------------
// apply_intent
// ---------------------------------------------------------------------------

/// Apply one user intent to the session.
///
/// ```rust
/// use sign_bridge::session::{apply_intent, lock_state, new_shared_state, Intent, Mode};
/// # use sign_bridge::remote::{PredictionReply, RemoteClient, RemoteError, TrainingReport};
/// # use sign_bridge::landmark::LandmarkVector;
/// # struct Offline;
/// # #[async_trait::async_trait]
/// # impl RemoteClient for Offline {
/// #     async fn submit_sample(&self, _: &str, _: &LandmarkVector) -> Result<(), RemoteError> { Err(RemoteError::Timeout) }
/// #     async fn request_training(&self) -> Result<TrainingReport, RemoteError> { Err(RemoteError::Timeout) }
/// #     async fn request_prediction(&self, _: &LandmarkVector) -> Result<PredictionReply, RemoteError> { Err(RemoteError::Timeout) }
/// # }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let state = new_shared_state();
/// apply_intent(&state, &Offline, Intent::SetLabel("Hello".into())).await.unwrap();
/// apply_intent(&state, &Offline, Intent::ToggleCollect).await.unwrap();
/// assert_eq!(lock_state(&state).mode(), Mode::Collect);
/// # }
/// ```
pub async fn apply_intent(
    state: &SharedState,
    remote: &dyn RemoteClient,
    intent: Intent,
) -> Result<IntentOutcome, SessionError> {
    log::debug!("session: intent {intent:?}");

    match intent {
        Intent::Train => Ok(train(state, remote).await),
        Intent::ToggleCollect => {
            lock_state(state).toggle_collect();
            Ok(IntentOutcome::Applied)
        }
        Intent::StartPredict => {
            lock_state(state).set_mode(Mode::Predict);
            Ok(IntentOutcome::Applied)
        }
        Intent::Stop => {
            lock_state(state).set_mode(Mode::Idle);
            Ok(IntentOutcome::Applied)
        }
        Intent::SetLabel(label) => {
            lock_state(state).set_label(label)?;
            Ok(IntentOutcome::Applied)
        }
        Intent::AddWord => {
            lock_state(state).append_prediction()?;
            Ok(IntentOutcome::Applied)
        }
        Intent::SetSentence(text) => {
            lock_state(state).set_sentence(text);
            Ok(IntentOutcome::Applied)
        }
        Intent::ClearSentence => {
            lock_state(state).clear_sentence();
            Ok(IntentOutcome::Applied)
        }
        Intent::Speak => {
            let sentence = lock_state(state).sentence().to_string();
            if sentence.trim().is_empty() {
                return Err(SessionError::NothingToSpeak);
            }
            Ok(IntentOutcome::Speak(sentence))
        }
    }
}

/// Run a training request and report it through the status line.
///
/// Mode and sample count are left alone whatever the outcome.
pub async fn train(state: &SharedState, remote: &dyn RemoteClient) -> IntentOutcome {
    begin_training(state);
    finish_training(state, remote).await
}

/// Show the in-flight status.  Callers that run the request in a separate
/// task call this first, so the status is visible before the task starts.
pub fn begin_training(state: &SharedState) {
    lock_state(state).set_status(STATUS_TRAINING);
}

/// Await the training request and replace the in-flight status with its
/// outcome.
pub async fn finish_training(state: &SharedState, remote: &dyn RemoteClient) -> IntentOutcome {
    match remote.request_training().await {
        Ok(report) => {
            let status = format!("Success! Accuracy: {:.2}", report.accuracy);
            log::info!("session: {status}");
            lock_state(state).set_status(status);
            IntentOutcome::Trained {
                accuracy: report.accuracy,
            }
        }
        Err(e) => {
            log::error!("session: training failed: {e}");
            lock_state(state).set_status(STATUS_TRAINING_FAILED);
            IntentOutcome::TrainingFailed
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
