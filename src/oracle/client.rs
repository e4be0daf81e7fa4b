use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use super::error::OracleError;
use super::parse::message_content;
use super::{OracleRequest, ScoringOracle};
use crate::config::{Config, OracleAuth};

/// Oracle backed by an OpenAI-compatible chat-completions endpoint.
///
/// One POST per call. No retries; transport timeouts are reqwest's defaults.
#[derive(Debug, Clone)]
pub struct ChatCompletionsOracle {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
    auth: OracleAuth,
    model: String,
}

impl ChatCompletionsOracle {
    pub fn new(
        url: impl Into<String>,
        api_key: Option<String>,
        auth: OracleAuth,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            api_key,
            auth,
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.oracle_url.clone(),
            config.oracle_api_key.clone(),
            config.oracle_auth,
            config.oracle_model.clone(),
        )
    }

    /// Builds the chat-completions body for `request`.
    pub fn build_request(
        &self,
        request: &OracleRequest,
    ) -> Result<CreateChatCompletionRequest, OracleError> {
        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(request.system.as_str())
            .build()
            .map_err(OracleError::malformed)?;
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(request.user.as_str())
            .build()
            .map_err(OracleError::malformed)?;

        CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages([
                ChatCompletionRequestMessage::System(system),
                ChatCompletionRequestMessage::User(user),
            ])
            .temperature(request.temperature)
            .top_p(request.top_p)
            .max_completion_tokens(request.max_tokens)
            .build()
            .map_err(OracleError::malformed)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match (&self.api_key, self.auth) {
            (Some(key), OracleAuth::Bearer) => builder.bearer_auth(key),
            (Some(key), OracleAuth::ApiKeyHeader) => builder.header("api-key", key),
            (None, _) => builder,
        }
    }
}

#[async_trait]
impl ScoringOracle for ChatCompletionsOracle {
    #[instrument(skip_all, fields(purpose = %request.purpose, model = %self.model))]
    async fn complete(&self, request: &OracleRequest) -> Result<String, OracleError> {
        let body = self.build_request(request)?;

        let response = self
            .authorize(self.http.post(&self.url))
            .json(&body)
            .send()
            .await
            .map_err(OracleError::unavailable)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(OracleError::unavailable(format!("HTTP {}: {}", status, detail)));
        }

        let envelope: Value = response.json().await.map_err(OracleError::malformed)?;
        let content = message_content(&envelope)
            .ok_or_else(|| OracleError::malformed("missing choices[0].message.content"))?;

        debug!(chars = content.len(), "Oracle responded");
        Ok(content.to_string())
    }
}
