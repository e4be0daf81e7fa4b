//! HTTP client helpers for tests.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<(u16, Value), TestClientError> {
        let resp = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;
        let status = resp.status().as_u16();
        Ok((status, resp.json().await?))
    }

    /// Status code and JSON body of `POST /api/search`.
    pub async fn search(&self, body: &Value) -> Result<(u16, Value), TestClientError> {
        self.post("/api/search", body).await
    }

    pub async fn load_model(
        &self,
        model_name: &str,
        model_type: &str,
    ) -> Result<(u16, Value), TestClientError> {
        self.post(
            "/api/huggingface/load",
            &json!({"model_name": model_name, "model_type": model_type}),
        )
        .await
    }

    pub async fn unload_model(
        &self,
        model_name: &str,
        model_type: &str,
    ) -> Result<(u16, Value), TestClientError> {
        self.post(
            "/api/huggingface/unload",
            &json!({"model_name": model_name, "model_type": model_type}),
        )
        .await
    }

    pub async fn models(&self, model_type: Option<&str>) -> Result<Value, TestClientError> {
        let mut builder = self.client.get(self.url("/api/huggingface/models"));
        if let Some(kind) = model_type {
            builder = builder.query(&[("type", kind)]);
        }
        let resp = builder.send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        let resp = self.client.get(self.url("/healthz")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0} - Body: {1}")]
    UnexpectedStatus(u16, String),
}
