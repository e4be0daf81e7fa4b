use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{ResearchError, SearchBackend, SearchSettings, SearchSystem};
use crate::config::Config;

/// Google Programmable Search JSON endpoint.
pub const DEFAULT_GOOGLE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Google returns at most this many results per request.
const GOOGLE_MAX_RESULTS: usize = 10;

/// Bing returns at most this many results per request.
const BING_MAX_RESULTS: usize = 50;

/// [`SearchBackend`] over Bing Web Search v7 and Google Programmable Search.
#[derive(Debug, Clone)]
pub struct WebSearch {
    http: reqwest::Client,
    bing_url: String,
    bing_key: Option<String>,
    google_url: String,
    google_key: Option<String>,
    google_cx: Option<String>,
}

impl WebSearch {
    pub fn new(
        bing_url: impl Into<String>,
        bing_key: Option<String>,
        google_url: impl Into<String>,
        google_key: Option<String>,
        google_cx: Option<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            bing_url: bing_url.into(),
            bing_key,
            google_url: google_url.into(),
            google_key,
            google_cx,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.bing_url.clone(),
            config.bing_api_key.clone(),
            DEFAULT_GOOGLE_URL,
            config.google_api_key.clone(),
            config.google_cx.clone(),
        )
    }

    async fn bing(
        &self,
        query: &str,
        attribute: &str,
        count: usize,
    ) -> Result<Vec<String>, ResearchError> {
        let key = self.bing_key.as_deref().ok_or(ResearchError::NotConfigured {
            backend: "bing",
            missing: "FACTCHECK_BING_API_KEY",
        })?;

        let count = count.min(BING_MAX_RESULTS).to_string();
        let q = format!("{query} {attribute}");
        let response = self
            .http
            .get(&self.bing_url)
            .header("Ocp-Apim-Subscription-Key", key)
            .query(&[
                ("q", q.as_str()),
                ("mkt", "en-US"),
                ("answerCount", "10"),
                ("count", count.as_str()),
                ("promote", "webpages"),
            ])
            .send()
            .await?;

        let body = json_body(response).await?;
        Ok(bing_urls(&body))
    }

    async fn google(
        &self,
        query: &str,
        attribute: &str,
        count: usize,
    ) -> Result<Vec<String>, ResearchError> {
        let key = self.google_key.as_deref().ok_or(ResearchError::NotConfigured {
            backend: "google",
            missing: "FACTCHECK_GOOGLE_API_KEY",
        })?;
        let cx = self.google_cx.as_deref().ok_or(ResearchError::NotConfigured {
            backend: "google",
            missing: "FACTCHECK_GOOGLE_CX",
        })?;

        let num = count.clamp(1, GOOGLE_MAX_RESULTS).to_string();
        let q = format!("Give articles related to the query: {query} with the attribute : {attribute}");
        let response = self
            .http
            .get(&self.google_url)
            .query(&[("key", key), ("cx", cx), ("q", q.as_str()), ("num", num.as_str())])
            .send()
            .await?;

        let body = json_body(response).await?;
        Ok(google_urls(&body))
    }
}

#[async_trait]
impl SearchBackend for WebSearch {
    #[instrument(skip(self, settings), fields(system = %settings.system))]
    async fn search(
        &self,
        query: &str,
        attribute: &str,
        settings: &SearchSettings,
    ) -> Result<Vec<String>, ResearchError> {
        let urls = match settings.system {
            SearchSystem::Bing => self.bing(query, attribute, settings.num_results).await?,
            SearchSystem::Google => self.google(query, attribute, settings.num_results).await?,
        };
        debug!(results = urls.len(), "Search complete");
        Ok(urls)
    }
}

async fn json_body(response: reqwest::Response) -> Result<Value, ResearchError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ResearchError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}

/// URLs from a Bing `webPages.value` list, in rank order.
pub fn bing_urls(body: &Value) -> Vec<String> {
    collect_urls(body.pointer("/webPages/value"), "url")
}

/// URLs from a Google `items` list, in rank order.
pub fn google_urls(body: &Value) -> Vec<String> {
    collect_urls(body.get("items"), "link")
}

fn collect_urls(list: Option<&Value>, field: &str) -> Vec<String> {
    list.and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get(field).and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
