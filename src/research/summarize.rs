use async_trait::async_trait;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use genai::resolver::{AuthData, AuthResolver};
use genai::{Client, ModelIden};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::{ResearchError, SummaryGenerator, SummaryRequest};
use crate::evaluation::{Deployment, GeneratorBackend, GeneratorSettings, HostedModelSettings};
use crate::oracle::extract_json_object;
use crate::registry::{ModelHub, ModelKind, ModelRegistry, RegistryError};

/// Paragraphs kept from a hosted-inference generation.
const API_PARAGRAPHS: usize = 4;

/// Paragraphs kept from a registry model generation.
const REGISTRY_PARAGRAPHS: usize = 3;

/// Keys of the JSON object the chat model is asked for, in output order.
const SUMMARY_KEYS: [&str; 4] = ["summary1", "summary2", "summary3", "summary4"];

const SYSTEM_PROMPT: &str = r#"Analyze the linked articles and extract the key insights that address the query and the selected aspect. Write an evidence-based summary that combines perspectives from several sources without repeating itself. Each point must present one distinct argument, include concrete supporting evidence such as facts, figures, dates or quotations, and add information not covered by the other points.

Write each point as one or two sentences and answer only with this JSON object:

{
  "summary1": "First key insight with supporting evidence.",
  "summary2": "Second distinct perspective with relevant facts.",
  "summary3": "Third angle with specific supporting details.",
  "summary4": "Another perspective with concrete evidence."
}"#;

/// Generates attribute summaries with a chat model or a Hugging Face model.
#[derive(Clone)]
pub struct ChatSummaryGenerator {
    client: Client,
    model: String,
    hub: Arc<dyn ModelHub>,
    registry: Arc<ModelRegistry>,
}

impl ChatSummaryGenerator {
    pub fn new(
        client: Client,
        model: impl Into<String>,
        hub: Arc<dyn ModelHub>,
        registry: Arc<ModelRegistry>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            hub,
            registry,
        }
    }

    async fn chat_summary(
        &self,
        request: &SummaryRequest<'_>,
        api_key: Option<&str>,
    ) -> Result<Vec<String>, ResearchError> {
        let links =
            serde_json::to_string(request.article_links).map_err(ResearchError::generation)?;
        let chat = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "Query: {}, aspect: {}, documents: {}",
                request.query, request.attribute, links
            )),
        ]);
        let options = ChatOptions::default()
            .with_temperature(0.7)
            .with_top_p(0.95)
            .with_max_tokens(800);

        let client = match api_key {
            Some(key) => client_with_key(key),
            None => self.client.clone(),
        };

        let response = client
            .exec_chat(&self.model, chat, Some(&options))
            .await
            .map_err(ResearchError::generation)?;
        let content = response.first_text().unwrap_or_default();

        parse_summary_json(content)
    }

    async fn hosted_summary(
        &self,
        request: &SummaryRequest<'_>,
        settings: &HostedModelSettings,
    ) -> Result<Vec<String>, ResearchError> {
        let model = settings
            .model()
            .ok_or_else(|| ResearchError::generation("model name is required"))?;
        let prompt = format!(
            "Generate a summary of the following articles about {} related to '{}'. \
             Provide 3 distinct paragraphs that capture the key points:",
            request.attribute, request.query
        );
        let params = settings.generation_params();

        let (token, limit) = match settings.deployment {
            Deployment::Api => {
                let token = settings
                    .api_token()
                    .ok_or_else(|| ResearchError::generation("API key is required"))?;
                (Some(token), API_PARAGRAPHS)
            }
            Deployment::Registry => {
                if !self.registry.is_loaded(ModelKind::Generator, model) {
                    return Err(RegistryError::NotLoaded {
                        model: model.to_string(),
                        kind: ModelKind::Generator,
                    }
                    .into());
                }
                (None, REGISTRY_PARAGRAPHS)
            }
        };

        let text = self.hub.generate(model, &prompt, token, &params).await?;
        Ok(split_paragraphs(&text, limit))
    }
}

impl std::fmt::Debug for ChatSummaryGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSummaryGenerator")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SummaryGenerator for ChatSummaryGenerator {
    #[instrument(skip_all, fields(attribute = request.attribute))]
    async fn summarize(
        &self,
        request: &SummaryRequest<'_>,
        settings: &GeneratorSettings,
    ) -> Vec<String> {
        let result = match &settings.backend {
            GeneratorBackend::Default => {
                self.chat_summary(request, settings.api_key.as_deref()).await
            }
            GeneratorBackend::HostedModel(hf) => self.hosted_summary(request, hf).await,
        };

        match result {
            Ok(paragraphs) => {
                debug!(paragraphs = paragraphs.len(), "Summary generated");
                paragraphs
            }
            Err(e) => {
                warn!(error = %e, "Summary generation failed");
                Vec::new()
            }
        }
    }
}

/// genai client that authenticates every provider with `key`.
fn client_with_key(key: &str) -> Client {
    let key = key.to_string();
    let resolver = AuthResolver::from_resolver_fn(
        move |_model: ModelIden| -> Result<Option<AuthData>, genai::resolver::Error> {
            Ok(Some(AuthData::from_single(key.clone())))
        },
    );
    Client::builder().with_auth_resolver(resolver).build()
}

/// Reads `summary1..summary4` from chat output, tolerating Markdown code fences.
pub fn parse_summary_json(content: &str) -> Result<Vec<String>, ResearchError> {
    let unfenced = strip_code_fence(content);
    let value: Value = match serde_json::from_str(unfenced) {
        Ok(value) => value,
        Err(_) => {
            let span = extract_json_object(unfenced).map_err(ResearchError::generation)?;
            serde_json::from_str(span).map_err(ResearchError::generation)?
        }
    };

    let paragraphs: Vec<String> = SUMMARY_KEYS
        .iter()
        .filter_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
        .collect();

    if paragraphs.is_empty() {
        return Err(ResearchError::generation("no summary keys in output"));
    }
    Ok(paragraphs)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Non-blank paragraphs separated by blank lines, at most `limit`.
pub fn split_paragraphs(text: &str, limit: usize) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}
