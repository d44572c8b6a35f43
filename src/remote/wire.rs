//! JSON payloads exchanged with the training / inference service.
//!
//! | Endpoint        | Request                      | Reply                          |
//! |-----------------|------------------------------|--------------------------------|
//! | `POST /collect` | `{label, landmarks[63]}`     | `{"status": "success"}`        |
//! | `POST /train`   | —                            | `{"status", "accuracy"}`       |
//! | `POST /predict` | `{landmarks[63]}`            | `{prediction, confidence}`     |
//! | any, on failure | —                            | `{"error": "..."}` + 4xx/5xx   |
//!
//! The service reports `accuracy` as a decimal string (`"0.95"`) and echoes
//! class labels back with whatever type they were stored as, so both fields
//! accept a string or a number.

use serde::{Deserialize, Deserializer, Serialize};

use crate::landmark::LandmarkVector;
use crate::session::Prediction;

#[derive(Debug, Serialize)]
pub struct CollectRequest<'a> {
    pub label: &'a str,
    pub landmarks: &'a LandmarkVector,
}

#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub landmarks: &'a LandmarkVector,
}

/// Reply to `POST /predict`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionReply {
    #[serde(deserialize_with = "text_or_number")]
    pub prediction: String,
    pub confidence: f64,
}

impl From<PredictionReply> for Prediction {
    fn from(reply: PredictionReply) -> Self {
        Prediction::new(reply.prediction, reply.confidence)
    }
}

/// Reply to `POST /train`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrainingReport {
    #[serde(deserialize_with = "number_or_text")]
    pub accuracy: f64,
}

#[derive(Debug, Deserialize)]
pub struct ErrorReply {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Lenient scalar decoding
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(f64),
    Text(String),
}

fn number_or_text<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Scalar::deserialize(deserializer)? {
        Scalar::Number(n) => Ok(n),
        Scalar::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Number(n) => n.to_string(),
        Scalar::Text(s) => s,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
