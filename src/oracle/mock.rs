use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use super::error::OracleError;
use super::{OracleRequest, ScoringOracle};

type Responder = dyn Fn(&OracleRequest) -> Result<String, OracleError> + Send + Sync;

/// Test oracle with a scripted answer. Every request is recorded.
#[derive(Clone)]
pub struct MockOracle {
    responder: Arc<Responder>,
    requests: Arc<Mutex<Vec<OracleRequest>>>,
}

impl MockOracle {
    /// Always answers `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::with_responder(move |_| Ok(text.clone()))
    }

    /// Always fails with `error`.
    pub fn failing(error: OracleError) -> Self {
        Self::with_responder(move |_| Err(error.clone()))
    }

    /// Answers with whatever `responder` returns for each request.
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&OracleRequest) -> Result<String, OracleError> + Send + Sync + 'static,
    {
        Self {
            responder: Arc::new(responder),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Requests seen so far, in call order.
    pub fn requests(&self) -> Vec<OracleRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl std::fmt::Debug for MockOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockOracle")
            .field("calls", &self.call_count())
            .finish()
    }
}

#[async_trait]
impl ScoringOracle for MockOracle {
    async fn complete(&self, request: &OracleRequest) -> Result<String, OracleError> {
        self.requests.lock().push(request.clone());
        (self.responder)(request)
    }
}
