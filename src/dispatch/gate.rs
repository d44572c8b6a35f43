//! Minimum-interval gate used to throttle dispatch per mode.
//!
//! The gate is a pure wall-clock comparison: a call that arrives too early is
//! skipped, never queued.  Time is passed in by the caller so tests can drive
//! it with synthetic instants.

use std::time::{Duration, Instant};

/// Last-fire timestamp plus a fixed minimum interval.
///
/// A fresh gate is open; afterwards it opens again only once **strictly
/// more** than `interval` has elapsed since the last recorded fire.
///
/// ```
/// use std::time::{Duration, Instant};
/// use sign_bridge::dispatch::RateGate;
///
/// let t0 = Instant::now();
/// let mut gate = RateGate::new(Duration::from_millis(100));
/// assert!(gate.is_open(t0));
/// gate.record(t0);
/// assert!(!gate.is_open(t0 + Duration::from_millis(100)));
/// assert!(gate.is_open(t0 + Duration::from_millis(101)));
/// ```
#[derive(Debug, Clone)]
pub struct RateGate {
    interval: Duration,
    last_fire: Option<Instant>,
}

impl RateGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fire: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// `true` when a dispatch at `now` is allowed.
    pub fn is_open(&self, now: Instant) -> bool {
        match self.last_fire {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.interval,
        }
    }

    /// Mark a dispatch as having happened at `now`.
    pub fn record(&mut self, now: Instant) {
        self.last_fire = Some(now);
    }

    pub fn last_fire(&self) -> Option<Instant> {
        self.last_fire
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
