use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};

use super::{GenerationParams, ModelHub, RegistryError};

/// A generation call recorded by [`MockModelHub`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedGeneration {
    pub model: String,
    pub prompt: String,
    pub token: Option<String>,
    pub params: GenerationParams,
}

/// In-memory hub: a fixed set of known models and a queue of canned generations.
#[derive(Default)]
pub struct MockModelHub {
    known: HashSet<String>,
    responses: Mutex<VecDeque<Result<String, String>>>,
    fallback: Option<String>,
    calls: Mutex<Vec<RecordedGeneration>>,
}

impl MockModelHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `model` as existing on the hub.
    pub fn with_model(mut self, model: &str) -> Self {
        self.known.insert(model.to_string());
        self
    }

    /// Queues a successful generation.
    pub fn with_response(self, text: &str) -> Self {
        self.responses.lock().push_back(Ok(text.to_string()));
        self
    }

    /// Queues a failed generation (reported as HTTP 503).
    pub fn with_failure(self, body: &str) -> Self {
        self.responses.lock().push_back(Err(body.to_string()));
        self
    }

    /// Text returned once the queue is empty.
    pub fn with_fallback(mut self, text: &str) -> Self {
        self.fallback = Some(text.to_string());
        self
    }

    pub fn calls(&self) -> Vec<RecordedGeneration> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ModelHub for MockModelHub {
    async fn model_exists(&self, model: &str) -> Result<bool, RegistryError> {
        Ok(self.known.contains(model))
    }

    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        token: Option<&str>,
        params: &GenerationParams,
    ) -> Result<String, RegistryError> {
        self.calls.lock().push(RecordedGeneration {
            model: model.to_string(),
            prompt: prompt.to_string(),
            token: token.map(str::to_string),
            params: *params,
        });

        let next = self.responses.lock().pop_front();
        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(body)) => Err(RegistryError::Status { status: 503, body }),
            None => self.fallback.clone().ok_or(RegistryError::Status {
                status: 503,
                body: "no canned response".to_string(),
            }),
        }
    }
}
