//! Boundary to the remote training / inference service.
//!
//! This module provides:
//! * [`RemoteClient`] — async trait the session depends on.
//! * [`HttpRemoteClient`] — JSON-over-HTTP implementation.
//! * [`RemoteError`] — error variants for remote calls.
//! * Wire payloads ([`PredictionReply`], [`TrainingReport`]).
//!
//! # Quick start
//!
//! ```rust,no_run
//! use sign_bridge::config::AppConfig;
//! use sign_bridge::remote::{HttpRemoteClient, RemoteClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let client = HttpRemoteClient::from_config(&config.remote);
//!
//!     match client.request_training().await {
//!         Ok(report) => println!("accuracy {:.2}", report.accuracy),
//!         Err(e) => eprintln!("training failed: {e}"),
//!     }
//! }
//! ```

pub mod client;
pub mod wire;

#[cfg(test)]
pub mod mock;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{HttpRemoteClient, RemoteClient, RemoteError};
pub use wire::{PredictionReply, TrainingReport};

#[cfg(test)]
pub use mock::{Call, MockRemote};
