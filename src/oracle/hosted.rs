use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

use super::error::OracleError;
use super::{OracleRequest, ScoringOracle};
use crate::registry::{GenerationParams, ModelHub};

/// Oracle that routes prompts to a hosted Hugging Face model.
///
/// Hosted models take a single prompt, so system and user text are joined. Their output is free
/// text; callers should expect JSON embedded in prose.
#[derive(Clone)]
pub struct HostedModelOracle {
    hub: Arc<dyn ModelHub>,
    model: String,
    token: Option<String>,
}

impl HostedModelOracle {
    pub fn new(hub: Arc<dyn ModelHub>, model: impl Into<String>, token: Option<String>) -> Self {
        Self {
            hub,
            model: model.into(),
            token,
        }
    }
}

impl std::fmt::Debug for HostedModelOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedModelOracle")
            .field("model", &self.model)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

#[async_trait]
impl ScoringOracle for HostedModelOracle {
    #[instrument(skip_all, fields(purpose = %request.purpose, model = %self.model))]
    async fn complete(&self, request: &OracleRequest) -> Result<String, OracleError> {
        let params = GenerationParams {
            max_new_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            ..GenerationParams::default()
        };

        self.hub
            .generate(
                &self.model,
                &request.flattened_prompt(),
                self.token.as_deref(),
                &params,
            )
            .await
            .map_err(OracleError::unavailable)
    }
}
