//! Sign-language capture and translation session.
//!
//! Hand landmarks from an external detector are flattened into fixed-length
//! vectors and, depending on the session mode, either submitted to a remote
//! service as labeled training samples or sent for live classification.

pub mod config;
pub mod console;
pub mod dispatch;
pub mod landmark;
pub mod remote;
pub mod session;
