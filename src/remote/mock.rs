//! Recording test double for [`RemoteClient`].

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::landmark::LandmarkVector;
use crate::remote::client::{RemoteClient, RemoteError};
use crate::remote::wire::{PredictionReply, TrainingReport};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Collect { label: String },
    Train,
    Predict,
}

type Hook = Box<dyn Fn() + Send + Sync>;

/// Scripted [`RemoteClient`].
///
/// * `submit_sample` succeeds unless built with [`MockRemote::failing_collect`].
/// * `request_prediction` pops queued replies; an empty queue behaves like an
///   untrained model (`Rejected 400`).
/// * `request_training` returns the configured result.
/// * An optional hook runs inside every call, before it resolves, to simulate
///   user intents landing while a request is in flight.
pub struct MockRemote {
    calls: Mutex<Vec<Call>>,
    vectors: Mutex<Vec<LandmarkVector>>,
    collect_fails: bool,
    predictions: Mutex<VecDeque<Result<PredictionReply, RemoteError>>>,
    training: Result<TrainingReport, RemoteError>,
    hook: Option<Hook>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            vectors: Mutex::new(Vec::new()),
            collect_fails: false,
            predictions: Mutex::new(VecDeque::new()),
            training: Ok(TrainingReport { accuracy: 1.0 }),
            hook: None,
        }
    }

    pub fn failing_collect() -> Self {
        Self {
            collect_fails: true,
            ..Self::new()
        }
    }

    pub fn with_prediction(self, label: &str, confidence: f64) -> Self {
        self.predictions.lock().unwrap().push_back(Ok(PredictionReply {
            prediction: label.into(),
            confidence,
        }));
        self
    }

    pub fn with_prediction_error(self, err: RemoteError) -> Self {
        self.predictions.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn with_training(mut self, result: Result<TrainingReport, RemoteError>) -> Self {
        self.training = result;
        self
    }

    pub fn with_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Every vector passed to `submit_sample` or `request_prediction`, in
    /// call order.
    pub fn vectors(&self) -> Vec<LandmarkVector> {
        self.vectors.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
        if let Some(hook) = &self.hook {
            hook();
        }
    }
}

#[async_trait]
impl RemoteClient for MockRemote {
    async fn submit_sample(
        &self,
        label: &str,
        landmarks: &LandmarkVector,
    ) -> Result<(), RemoteError> {
        self.vectors.lock().unwrap().push(landmarks.clone());
        self.record(Call::Collect {
            label: label.to_string(),
        });
        if self.collect_fails {
            Err(RemoteError::Request("connection refused".into()))
        } else {
            Ok(())
        }
    }

    async fn request_training(&self) -> Result<TrainingReport, RemoteError> {
        self.record(Call::Train);
        self.training.clone()
    }

    async fn request_prediction(
        &self,
        landmarks: &LandmarkVector,
    ) -> Result<PredictionReply, RemoteError> {
        self.vectors.lock().unwrap().push(landmarks.clone());
        self.record(Call::Predict);
        self.predictions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(RemoteError::Rejected {
                    status: 400,
                    message: "Model not found. Train first!".into(),
                })
            })
    }
}
