//! Session state and the mode state machine.
//!
//! [`SessionState`] is the single authoritative record the presentation
//! renders: mode, active label, sample counter, last accepted prediction,
//! sentence and status line.  It lives behind [`SharedState`] so the control
//! loop (user intents) and the dispatch task can both reach it; every
//! mutation is a short critical section.
//!
//! # Mode transitions
//!
//! ```text
//! Idle ◀──toggle──▶ Collect        (entering Collect resets the counter)
//! any  ──predict──▶ Predict
//! any  ──stop─────▶ Idle
//! ```
//!
//! Only user intents move the mode.  Each real transition bumps a
//! generation number; dispatch results tagged with an older generation are
//! dropped (see [`crate::dispatch::DispatchLoop`]).

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

/// Status shown while idle, and at session start.
pub const STATUS_READY: &str = "System Ready";
/// Status shown after entering collect mode.
pub const STATUS_RECORDING: &str = "Recording...";
/// Status shown after entering predict mode.
pub const STATUS_TRANSLATING: &str = "Translating...";

/// Displayed in place of a prediction until one has been accepted.
pub const NO_PREDICTION: &str = "-";

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

/// Rejected user intents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The label cannot be edited while samples are being collected.
    #[error("label is locked while collecting")]
    LabelLocked,

    /// "Add word" was requested before any prediction was accepted.
    #[error("no prediction to add yet")]
    NoPrediction,

    /// "Speak" was requested with an empty sentence.
    #[error("sentence is empty")]
    NothingToSpeak,
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Idle,
    /// Landmark vectors are submitted as labeled training samples.
    Collect,
    /// Landmark vectors are sent for live classification.
    Predict,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::Collect => "collect",
            Mode::Predict => "predict",
        }
    }

    /// Status message set when this mode is entered.
    pub fn entry_status(&self) -> &'static str {
        match self {
            Mode::Idle => STATUS_READY,
            Mode::Collect => STATUS_RECORDING,
            Mode::Predict => STATUS_TRANSLATING,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

/// A classifier guess that cleared the confidence gate.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    /// In `[0, 1]`.
    pub confidence: f64,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }

    /// `Detected: Hello (72%)`
    pub fn status_line(&self) -> String {
        format!(
            "Detected: {} ({:.0}%)",
            self.label,
            (self.confidence * 100.0).round()
        )
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// The mode/label pair the dispatch loop acts on, read under one lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub mode: Mode,
    pub label: String,
    pub generation: u64,
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SessionState {
    mode: Mode,
    label: String,
    sample_count: u32,
    prediction: Option<Prediction>,
    sentence: String,
    status: String,
    generation: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Idle,
            label: String::new(),
            sample_count: 0,
            prediction: None,
            sentence: String::new(),
            status: STATUS_READY.to_string(),
            generation: 0,
        }
    }

    // ── Read access ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        self.prediction.as_ref()
    }

    /// The accepted prediction's label, or `-` before the first one.
    pub fn prediction_text(&self) -> &str {
        self.prediction
            .as_ref()
            .map(|p| p.label.as_str())
            .unwrap_or(NO_PREDICTION)
    }

    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            label: self.label.clone(),
            generation: self.generation,
        }
    }

    /// The caption drawn over the camera view.
    pub fn overlay_text(&self) -> String {
        match self.mode {
            Mode::Collect => format!("Recording: {} ({})", self.label, self.sample_count),
            _ => format!("Detected: {}", self.prediction_text()),
        }
    }

    // ── User intents ─────────────────────────────────────────────────────

    /// Enter `mode`.  Returns `false` (and changes nothing) when already in it.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if self.mode == mode {
            return false;
        }
        log::debug!("session: {} → {}", self.mode, mode);
        self.mode = mode;
        self.generation += 1;
        if mode == Mode::Collect {
            self.sample_count = 0;
        }
        self.status = mode.entry_status().to_string();
        true
    }

    /// The collect button: `Collect → Idle`, anything else `→ Collect`.
    pub fn toggle_collect(&mut self) -> Mode {
        let next = if self.mode == Mode::Collect {
            Mode::Idle
        } else {
            Mode::Collect
        };
        self.set_mode(next);
        next
    }

    pub fn set_label(&mut self, label: impl Into<String>) -> Result<(), SessionError> {
        if self.mode == Mode::Collect {
            return Err(SessionError::LabelLocked);
        }
        self.label = label.into();
        Ok(())
    }

    /// Append the current prediction followed by one space.
    pub fn append_prediction(&mut self) -> Result<(), SessionError> {
        let word = self
            .prediction
            .as_ref()
            .map(|p| p.label.clone())
            .ok_or(SessionError::NoPrediction)?;
        self.sentence.push_str(&word);
        self.sentence.push(' ');
        Ok(())
    }

    pub fn set_sentence(&mut self, sentence: impl Into<String>) {
        self.sentence = sentence.into();
    }

    pub fn clear_sentence(&mut self) {
        self.sentence.clear();
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    // ── Dispatch outcomes ────────────────────────────────────────────────

    pub(crate) fn record_sample(&mut self) {
        self.sample_count += 1;
    }

    pub(crate) fn accept_prediction(&mut self, prediction: Prediction) {
        self.status = prediction.status_line();
        self.prediction = Some(prediction);
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`SessionState`].
///
/// Lock for a short critical section only; never hold the guard across an
/// `.await`.
pub type SharedState = Arc<Mutex<SessionState>>;

pub fn new_shared_state() -> SharedState {
    Arc::new(Mutex::new(SessionState::new()))
}

/// Lock the session.  A panic in another holder does not invalidate the
/// plain-data state, so a poisoned lock is recovered rather than propagated.
pub fn lock_state(state: &SharedState) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn predicting_with(label: &str) -> SessionState {
        let mut st = SessionState::new();
        st.set_mode(Mode::Predict);
        st.accept_prediction(Prediction::new(label, 0.9));
        st
    }

    #[test]
    fn starts_idle_and_ready() {
        let st = SessionState::default();
        assert_eq!(st.mode(), Mode::Idle);
        assert_eq!(st.status(), "System Ready");
        assert_eq!(st.prediction_text(), "-");
        assert_eq!(st.sample_count(), 0);
        assert!(st.sentence().is_empty());
    }

    #[test]
    fn toggle_collect_round_trip() {
        let mut st = SessionState::new();
        assert_eq!(st.toggle_collect(), Mode::Collect);
        assert_eq!(st.status(), "Recording...");
        assert_eq!(st.toggle_collect(), Mode::Idle);
        assert_eq!(st.status(), "System Ready");
    }

    #[test]
    fn toggle_from_predict_enters_collect() {
        let mut st = SessionState::new();
        st.set_mode(Mode::Predict);
        assert_eq!(st.toggle_collect(), Mode::Collect);
    }

    #[test]
    fn entering_collect_resets_counter_from_any_mode() {
        for from in [Mode::Idle, Mode::Predict] {
            let mut st = SessionState::new();
            st.set_mode(Mode::Collect);
            st.record_sample();
            st.record_sample();
            st.set_mode(from);
            st.set_mode(Mode::Collect);
            assert_eq!(st.sample_count(), 0, "from {from}");
        }
    }

    #[test]
    fn leaving_collect_keeps_counter() {
        let mut st = SessionState::new();
        st.set_mode(Mode::Collect);
        st.record_sample();
        st.set_mode(Mode::Idle);
        assert_eq!(st.sample_count(), 1);
    }

    #[test]
    fn predict_sets_translating_status() {
        let mut st = SessionState::new();
        assert!(st.set_mode(Mode::Predict));
        assert_eq!(st.status(), "Translating...");
    }

    #[test]
    fn reentering_same_mode_is_noop() {
        let mut st = predicting_with("Hello");
        let generation = st.generation();
        assert!(!st.set_mode(Mode::Predict));
        assert_eq!(st.generation(), generation);
        assert_eq!(st.status(), "Detected: Hello (90%)");
    }

    #[test]
    fn transitions_bump_generation() {
        let mut st = SessionState::new();
        let g0 = st.generation();
        st.set_mode(Mode::Collect);
        st.set_mode(Mode::Idle);
        assert_eq!(st.generation(), g0 + 2);
    }

    #[test]
    fn label_locked_while_collecting() {
        let mut st = SessionState::new();
        st.set_label("Hello").unwrap();
        st.set_mode(Mode::Collect);
        assert_eq!(st.set_label("World"), Err(SessionError::LabelLocked));
        assert_eq!(st.label(), "Hello");
    }

    #[test]
    fn snapshot_pairs_mode_and_label() {
        let mut st = SessionState::new();
        st.set_label("Yes").unwrap();
        st.set_mode(Mode::Collect);
        let snap = st.snapshot();
        assert_eq!(snap.mode, Mode::Collect);
        assert_eq!(snap.label, "Yes");
        assert_eq!(snap.generation, st.generation());
    }

    #[test]
    fn append_adds_word_and_space() {
        let mut st = predicting_with("Hello");
        st.append_prediction().unwrap();
        st.accept_prediction(Prediction::new("World", 0.8));
        st.append_prediction().unwrap();
        assert_eq!(st.sentence(), "Hello World ");
    }

    #[test]
    fn append_without_prediction_is_rejected() {
        let mut st = SessionState::new();
        assert_eq!(st.append_prediction(), Err(SessionError::NoPrediction));
        assert!(st.sentence().is_empty());
    }

    #[test]
    fn sentence_edit_and_clear() {
        let mut st = SessionState::new();
        st.set_sentence("hi there");
        assert_eq!(st.sentence(), "hi there");
        st.clear_sentence();
        assert_eq!(st.sentence(), "");
    }

    #[test]
    fn status_line_rounds_percentage() {
        assert_eq!(
            Prediction::new("Hello", 0.72).status_line(),
            "Detected: Hello (72%)"
        );
        assert_eq!(
            Prediction::new("No", 0.676).status_line(),
            "Detected: No (68%)"
        );
    }

    #[test]
    fn overlay_text_per_mode() {
        let mut st = SessionState::new();
        assert_eq!(st.overlay_text(), "Detected: -");
        st.set_label("Thanks").unwrap();
        st.set_mode(Mode::Collect);
        st.record_sample();
        assert_eq!(st.overlay_text(), "Recording: Thanks (1)");
    }

    #[test]
    fn shared_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedState>();
    }
}
