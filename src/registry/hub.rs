use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, error, instrument};

use super::{GenerationParams, ModelHub, RegistryError};

/// Hugging Face model metadata endpoint.
pub const DEFAULT_HUB_API_URL: &str = "https://huggingface.co/api/models";

/// Hugging Face hosted inference endpoint.
pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";

/// [`ModelHub`] backed by the public Hugging Face APIs.
#[derive(Debug, Clone)]
pub struct HfHub {
    http: reqwest::Client,
    api_url: String,
    inference_url: String,
    token: Option<String>,
}

impl HfHub {
    pub fn new(token: Option<String>) -> Self {
        Self::with_endpoints(DEFAULT_HUB_API_URL, DEFAULT_INFERENCE_URL, token)
    }

    pub fn with_endpoints(
        api_url: impl Into<String>,
        inference_url: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            inference_url: inference_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }
}

#[async_trait]
impl ModelHub for HfHub {
    #[instrument(skip(self))]
    async fn model_exists(&self, model: &str) -> Result<bool, RegistryError> {
        let url = format!("{}/{}", self.api_url, model);
        let response = self.http.get(&url).send().await.map_err(|e| {
            error!(model, error = %e, "Error checking model");
            e
        })?;
        Ok(response.status().is_success())
    }

    #[instrument(skip(self, prompt, token), fields(prompt_chars = prompt.len()))]
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        token: Option<&str>,
        params: &GenerationParams,
    ) -> Result<String, RegistryError> {
        let token = token
            .or(self.token.as_deref())
            .ok_or_else(|| RegistryError::MissingToken {
                model: model.to_string(),
            })?;

        let payload = json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": params.max_new_tokens,
                "temperature": params.temperature,
                "top_p": params.top_p,
                "repetition_penalty": params.repetition_penalty,
                "do_sample": true,
            }
        });

        let url = format!("{}/{}", self.inference_url, model);
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let result: Value = response.json().await?;
        let text = generated_text(&result, prompt);
        debug!(chars = text.len(), "Hub generation complete");
        Ok(text)
    }
}

/// Pulls `generated_text` out of an inference response, dropping an echoed prompt.
///
/// Unknown response shapes are returned as their JSON text.
pub fn generated_text(result: &Value, prompt: &str) -> String {
    let Some(text) = result
        .get(0)
        .and_then(|first| first.get("generated_text"))
        .and_then(Value::as_str)
    else {
        return result.to_string();
    };

    match text.strip_prefix(prompt) {
        Some(rest) => rest.trim().to_string(),
        None => text.to_string(),
    }
}
