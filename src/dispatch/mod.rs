//! Capture-dispatch: throttled routing of landmark vectors to the remote
//! service.
//!
//! # Architecture
//!
//! ```text
//! ConsoleReader / detector ──LandmarkVector (watch mailbox)──▶ DispatchLoop::run()
//!                                                               │
//!                      ┌────────────────────────────────────────┤
//!                      ▼                                        ▼
//!            RateGate (collect, 100 ms)              RateGate (predict, 500 ms)
//!                      │                                        │
//!                      ▼                                        ▼
//!          RemoteClient::submit_sample         RemoteClient::request_prediction
//!                      │                                        │
//!                      └──────────────▶ SharedState ◀───────────┘
//! ```

pub mod gate;
pub mod runner;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use gate::RateGate;
pub use runner::{frame_mailbox, DispatchLoop, DispatchOutcome, FrameReceiver, FrameSender};
