//! Core `RemoteClient` trait and the HTTP implementation.
//!
//! `HttpRemoteClient` talks to the training / inference service over plain
//! JSON-over-HTTP.  All connection details come from [`RemoteConfig`].

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::RemoteConfig;
use crate::landmark::LandmarkVector;
use crate::remote::wire::{
    CollectRequest, ErrorReply, PredictRequest, PredictionReply, TrainingReport,
};

// ---------------------------------------------------------------------------
// RemoteError
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to the remote service.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("remote request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("remote rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The response body was not the expected JSON.
    #[error("failed to parse remote response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RemoteError::Timeout
        } else if e.is_decode() {
            RemoteError::Parse(e.to_string())
        } else {
            RemoteError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// RemoteClient trait
// ---------------------------------------------------------------------------

/// The three operations the session depends on.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn RemoteClient>` between the dispatch task and the control loop.
///
/// A failed or empty `request_prediction` is routine (the model may simply
/// not be trained yet); callers must not treat it as an error.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Persist one labeled training example.
    async fn submit_sample(&self, label: &str, landmarks: &LandmarkVector)
        -> Result<(), RemoteError>;

    /// Retrain over every sample submitted so far and report the accuracy.
    async fn request_training(&self) -> Result<TrainingReport, RemoteError>;

    /// Best-effort classification of one vector.
    async fn request_prediction(
        &self,
        landmarks: &LandmarkVector,
    ) -> Result<PredictionReply, RemoteError>;
}

// ---------------------------------------------------------------------------
// HttpRemoteClient
// ---------------------------------------------------------------------------

pub struct HttpRemoteClient {
    client: reqwest::Client,
    config: RemoteConfig,
}

impl HttpRemoteClient {
    /// Build a client from config.
    ///
    /// Every request is bounded by `timeout_secs`, except training which uses
    /// the longer `train_timeout_secs`.
    pub fn from_config(config: &RemoteConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// `GET /` — returns the service's greeting when it is reachable.
    pub async fn ping(&self) -> Result<String, RemoteError> {
        let response = self.client.get(self.url("/")).send().await?;
        let response = check_status(response).await?;
        Ok(response.text().await?)
    }
}

/// Turn a non-2xx response into [`RemoteError::Rejected`], using the
/// service's `{"error": ...}` message when it sent one.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorReply>(&body)
        .map(|e| e.error)
        .unwrap_or(body);

    Err(RemoteError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn submit_sample(
        &self,
        label: &str,
        landmarks: &LandmarkVector,
    ) -> Result<(), RemoteError> {
        let body = CollectRequest { label, landmarks };
        let response = self
            .client
            .post(self.url("/collect"))
            .json(&body)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn request_training(&self) -> Result<TrainingReport, RemoteError> {
        let response = self
            .client
            .post(self.url("/train"))
            .timeout(Duration::from_secs(self.config.train_timeout_secs))
            .send()
            .await?;
        let response = check_status(response).await?;
        response
            .json::<TrainingReport>()
            .await
            .map_err(|e| RemoteError::Parse(e.to_string()))
    }

    async fn request_prediction(
        &self,
        landmarks: &LandmarkVector,
    ) -> Result<PredictionReply, RemoteError> {
        let body = PredictRequest { landmarks };
        let response = self
            .client
            .post(self.url("/predict"))
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;
        response
            .json::<PredictionReply>()
            .await
            .map_err(|e| RemoteError::Parse(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
