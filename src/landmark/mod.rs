//! Hand-landmark types delivered by the external detector.
//!
//! # Pipeline
//!
//! ```text
//! detector ──DetectorFrame (0..n hands)──▶ vectorize() ──LandmarkVector (63)──▶ dispatch
//! ```
//!
//! The detector itself is a black box; this module only models what it hands
//! over for one frame and how the first hand is flattened for dispatch.
//!
//! # Frame format
//!
//! One JSON object per frame.  Each hand is a list of exactly
//! [`LANDMARKS_PER_HAND`] points in detector order:
//!
//! ```json
//! { "hands": [ [ {"x": 0.51, "y": 0.62, "z": -0.01}, ... ] ] }
//! ```
//!
//! The MediaPipe field name `multiHandLandmarks` is accepted as an alias.

pub mod vectorizer;

pub use vectorizer::{vectorize, LandmarkError, LandmarkVector, VECTOR_LEN};

use serde::{Deserialize, Serialize};

/// Number of landmarks the detector reports for one hand.
pub const LANDMARKS_PER_HAND: usize = 21;

// ---------------------------------------------------------------------------
// Landmark
// ---------------------------------------------------------------------------

/// A single 3-D landmark in the detector's normalised coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

// ---------------------------------------------------------------------------
// HandLandmarks
// ---------------------------------------------------------------------------

/// The full landmark set of one detected hand.
///
/// The fixed-size array makes a partially populated hand unrepresentable;
/// deserialising a hand with any other point count fails.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandLandmarks(pub [Landmark; LANDMARKS_PER_HAND]);

impl HandLandmarks {
    /// Iterate over the landmarks in detector order.
    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.0.iter()
    }
}

// ---------------------------------------------------------------------------
// DetectorFrame
// ---------------------------------------------------------------------------

/// Detector output for one camera frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectorFrame {
    /// Zero or more hands, in the order the detector reported them.
    #[serde(default, alias = "multiHandLandmarks")]
    pub hands: Vec<HandLandmarks>,
}

impl DetectorFrame {
    /// Parse one frame from its JSON representation.
    pub fn from_json(line: &str) -> Result<Self, LandmarkError> {
        serde_json::from_str(line).map_err(|e| LandmarkError::Parse(e.to_string()))
    }

    /// The hand used for dispatch.  Secondary hands are ignored.
    pub fn primary_hand(&self) -> Option<&HandLandmarks> {
        self.hands.first()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
