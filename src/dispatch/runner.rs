//! Dispatch loop — routes each landmark vector to collection or inference.
//!
//! [`DispatchLoop`] owns the per-mode [`RateGate`]s and is the only writer of
//! the sample counter, the accepted prediction and the prediction status.
//! It never changes mode, label or sentence.
//!
//! # Per-vector flow
//!
//! ```text
//! snapshot {mode, label, generation}   (one lock)
//!   ├─ Idle    → nothing
//!   ├─ Collect → label blank?  → skip
//!   │            gate closed?  → skip
//!   │            submit_sample → record gate
//!   │               ├─ Ok  → count += 1
//!   │               └─ Err → warn, count unchanged
//!   └─ Predict → gate closed?  → skip
//!                request_prediction → record gate
//!                   ├─ Err              → silent
//!                   ├─ conf ≤ threshold → discard
//!                   └─ conf > threshold → accept, refresh status
//! ```
//!
//! Vectors are handled one at a time, so at most one dispatch request is in
//! flight.  Frames arrive through a latest-value mailbox: while a request is
//! in flight each new frame replaces the pending one, and the next decision
//! always uses the newest pose.  If the mode changed while a request was in
//! flight, its result is dropped instead of leaking into the new mode.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::watch;

use crate::config::DispatchConfig;
use crate::landmark::LandmarkVector;
use crate::remote::RemoteClient;
use crate::session::{lock_state, Mode, Prediction, SharedState, Snapshot};

use super::gate::RateGate;

// ---------------------------------------------------------------------------
// Frame mailbox
// ---------------------------------------------------------------------------

/// Producer side of the frame mailbox.  `send_replace(Some(v))` overwrites
/// any frame the dispatch task has not picked up yet.
pub type FrameSender = watch::Sender<Option<LandmarkVector>>;
/// Consumer side of the frame mailbox, handed to [`DispatchLoop::run`].
pub type FrameReceiver = watch::Receiver<Option<LandmarkVector>>;

/// An empty single-slot mailbox.
pub fn frame_mailbox() -> (FrameSender, FrameReceiver) {
    watch::channel(None)
}

// ---------------------------------------------------------------------------
// DispatchOutcome
// ---------------------------------------------------------------------------

/// What happened to one vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Mode is idle.
    Idle,
    /// Collect mode without a usable label.
    NoLabel,
    /// The mode's minimum interval has not elapsed yet.
    Throttled,
    /// Sample stored and counted.
    SampleStored,
    /// Sample submission failed; logged, not counted.
    SampleFailed,
    /// Prediction cleared the confidence gate and is now displayed.
    PredictionAccepted,
    /// Prediction came back at or below the confidence threshold.
    PredictionRejected,
    /// No prediction available (untrained model, network failure).
    PredictionUnavailable,
    /// The mode changed while the request was in flight.
    Stale,
}

impl DispatchOutcome {
    /// `true` when a remote call was issued for this vector.
    pub fn dispatched(&self) -> bool {
        !matches!(
            self,
            DispatchOutcome::Idle | DispatchOutcome::NoLabel | DispatchOutcome::Throttled
        )
    }
}

// ---------------------------------------------------------------------------
// DispatchLoop
// ---------------------------------------------------------------------------

/// Create with [`DispatchLoop::new`], then spawn [`run`](Self::run) as a
/// tokio task fed by the frame mailbox.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use sign_bridge::config::AppConfig;
/// use sign_bridge::dispatch::{frame_mailbox, DispatchLoop};
/// use sign_bridge::remote::{HttpRemoteClient, RemoteClient};
/// use sign_bridge::session::new_shared_state;
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let state = new_shared_state();
/// let remote: Arc<dyn RemoteClient> = Arc::new(HttpRemoteClient::from_config(&config.remote));
///
/// let (frame_tx, frame_rx) = frame_mailbox();
/// let dispatcher = DispatchLoop::new(state, remote, &config.dispatch);
/// tokio::spawn(dispatcher.run(frame_rx));
/// # drop(frame_tx);
/// # }
/// ```
pub struct DispatchLoop {
    state: SharedState,
    remote: Arc<dyn RemoteClient>,
    collect_gate: RateGate,
    predict_gate: RateGate,
    confidence_threshold: f64,
}

impl DispatchLoop {
    pub fn new(state: SharedState, remote: Arc<dyn RemoteClient>, config: &DispatchConfig) -> Self {
        Self {
            state,
            remote,
            collect_gate: RateGate::new(config.collect_interval()),
            predict_gate: RateGate::new(config.predict_interval()),
            confidence_threshold: config.confidence_threshold,
        }
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Handle the newest vector each time the mailbox changes, until the
    /// sender is dropped.  A frame published just before the drop is still
    /// handled.
    pub async fn run(mut self, mut frame_rx: FrameReceiver) {
        while frame_rx.changed().await.is_ok() {
            let Some(vector) = frame_rx.borrow_and_update().clone() else {
                continue;
            };
            let outcome = self.dispatch(&vector, Instant::now()).await;
            log::trace!("dispatch: {outcome:?}");
        }

        log::info!("dispatch: frame mailbox closed, loop shutting down");
    }

    /// Decide and perform the dispatch for one vector observed at `now`.
    pub async fn dispatch(&mut self, vector: &LandmarkVector, now: Instant) -> DispatchOutcome {
        let snapshot = lock_state(&self.state).snapshot();

        match snapshot.mode {
            Mode::Idle => DispatchOutcome::Idle,
            Mode::Collect => self.collect(vector, &snapshot, now).await,
            Mode::Predict => self.predict(vector, &snapshot, now).await,
        }
    }

    // -----------------------------------------------------------------------
    // Per-mode handlers
    // -----------------------------------------------------------------------

    async fn collect(
        &mut self,
        vector: &LandmarkVector,
        snapshot: &Snapshot,
        now: Instant,
    ) -> DispatchOutcome {
        if snapshot.label.trim().is_empty() {
            return DispatchOutcome::NoLabel;
        }
        if !self.collect_gate.is_open(now) {
            return DispatchOutcome::Throttled;
        }

        let result = self.remote.submit_sample(&snapshot.label, vector).await;
        // The clock advances whether or not the sample was stored.
        self.collect_gate.record(now);

        if let Err(e) = result {
            log::warn!("dispatch: sample for {:?} not stored: {e}", snapshot.label);
            return DispatchOutcome::SampleFailed;
        }

        let mut st = lock_state(&self.state);
        if st.generation() != snapshot.generation {
            log::debug!("dispatch: mode changed during submit, sample not counted");
            return DispatchOutcome::Stale;
        }
        st.record_sample();
        log::debug!(
            "dispatch: stored sample #{} for {:?}",
            st.sample_count(),
            snapshot.label
        );
        DispatchOutcome::SampleStored
    }

    async fn predict(
        &mut self,
        vector: &LandmarkVector,
        snapshot: &Snapshot,
        now: Instant,
    ) -> DispatchOutcome {
        if !self.predict_gate.is_open(now) {
            return DispatchOutcome::Throttled;
        }

        let result = self.remote.request_prediction(vector).await;
        self.predict_gate.record(now);

        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                // Expected until a model has been trained.
                log::trace!("dispatch: no prediction ({e})");
                return DispatchOutcome::PredictionUnavailable;
            }
        };

        log::debug!(
            "dispatch: remote says {} ({:.2})",
            reply.prediction,
            reply.confidence
        );

        let confident = reply.confidence > self.confidence_threshold;
        if !confident {
            return DispatchOutcome::PredictionRejected;
        }

        let prediction = Prediction::from(reply);
        let mut st = lock_state(&self.state);
        if st.generation() != snapshot.generation {
            log::debug!("dispatch: mode changed during predict, result dropped");
            return DispatchOutcome::Stale;
        }
        st.accept_prediction(prediction);
        log::info!("dispatch: {}", st.status());
        DispatchOutcome::PredictionAccepted
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
