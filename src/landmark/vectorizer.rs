//! Frame vectorizer — flattens the primary hand into a fixed-length vector.

use serde::Serialize;
use thiserror::Error;

use super::{DetectorFrame, HandLandmarks, LANDMARKS_PER_HAND};

/// Length of a [`LandmarkVector`]: 21 landmarks × (x, y, z).
pub const VECTOR_LEN: usize = LANDMARKS_PER_HAND * 3;

// ---------------------------------------------------------------------------
// LandmarkError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LandmarkError {
    /// A raw vector did not hold exactly [`VECTOR_LEN`] values.
    #[error("expected 63 landmark values, got {0}")]
    WrongLength(usize),

    /// A detector frame could not be decoded.
    #[error("invalid detector frame: {0}")]
    Parse(String),
}

// ---------------------------------------------------------------------------
// LandmarkVector
// ---------------------------------------------------------------------------

/// Exactly [`VECTOR_LEN`] values, serialised as a plain JSON array.
///
/// The only constructors are [`vectorize`], [`LandmarkVector::from_hand`] and
/// the checked `TryFrom<Vec<f32>>`, so every instance has the full length.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LandmarkVector(Vec<f32>);

impl LandmarkVector {
    /// Concatenate `(x, y, z)` for each landmark in detector order.
    pub fn from_hand(hand: &HandLandmarks) -> Self {
        let values = hand.iter().flat_map(|lm| [lm.x, lm.y, lm.z]).collect();
        Self(values)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<f32>> for LandmarkVector {
    type Error = LandmarkError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        if values.len() != VECTOR_LEN {
            return Err(LandmarkError::WrongLength(values.len()));
        }
        Ok(Self(values))
    }
}

// ---------------------------------------------------------------------------
// vectorize
// ---------------------------------------------------------------------------

/// Produce the dispatch vector for one frame.
///
/// Returns `None` when the detector found no hand; that frame simply takes
/// no part in dispatch.  Only the first hand is used.
///
/// ```
/// use sign_bridge::landmark::{vectorize, DetectorFrame};
///
/// assert!(vectorize(&DetectorFrame::default()).is_none());
/// ```
pub fn vectorize(frame: &DetectorFrame) -> Option<LandmarkVector> {
    frame.primary_hand().map(LandmarkVector::from_hand)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::Landmark;

    fn hand(base: f32) -> HandLandmarks {
        let mut points = [Landmark::default(); LANDMARKS_PER_HAND];
        for (i, p) in points.iter_mut().enumerate() {
            let v = base + i as f32;
            *p = Landmark::new(v, v + 0.25, v + 0.5);
        }
        HandLandmarks(points)
    }

    #[test]
    fn no_hand_yields_no_vector() {
        assert!(vectorize(&DetectorFrame { hands: vec![] }).is_none());
    }

    #[test]
    fn vector_has_63_values() {
        let frame = DetectorFrame {
            hands: vec![hand(0.0)],
        };
        let v = vectorize(&frame).unwrap();
        assert_eq!(v.len(), VECTOR_LEN);
        assert_eq!(v.len(), 63);
    }

    #[test]
    fn values_are_xyz_in_detector_order() {
        let v = LandmarkVector::from_hand(&hand(0.0));
        let s = v.as_slice();
        assert_eq!(&s[0..3], &[0.0, 0.25, 0.5]);
        assert_eq!(&s[3..6], &[1.0, 1.25, 1.5]);
        assert_eq!(&s[60..63], &[20.0, 20.25, 20.5]);
    }

    #[test]
    fn secondary_hands_are_ignored() {
        let frame = DetectorFrame {
            hands: vec![hand(0.0), hand(100.0)],
        };
        let v = vectorize(&frame).unwrap();
        assert_eq!(v, LandmarkVector::from_hand(&hand(0.0)));
    }

    #[test]
    fn try_from_checks_length() {
        assert!(LandmarkVector::try_from(vec![0.0; VECTOR_LEN]).is_ok());
        assert_eq!(
            LandmarkVector::try_from(vec![0.0; 62]).unwrap_err(),
            LandmarkError::WrongLength(62)
        );
    }

    #[test]
    fn serialises_as_flat_array() {
        let v = LandmarkVector::try_from(vec![0.5; VECTOR_LEN]).unwrap();
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json.as_array().map(|a| a.len()), Some(VECTOR_LEN));
    }
}
