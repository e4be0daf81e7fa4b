//! Request-level generation and evaluation settings.
//!
//! The front end sends evaluation categories either as a list of `{name, isEnabled, prompt}`
//! items (with Hugging Face settings on whichever item carries a `huggingface` key) or as a map
//! keyed by category name. Both shapes are normalized here so nothing downstream inspects raw
//! JSON.


use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::constants::GROUNDEDNESS_CATEGORY;
use crate::registry::GenerationParams;

/// Where a Hugging Face model runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deployment {
    /// Hosted inference API, authenticated with the caller's key.
    Api,
    /// A model previously loaded through the registry.
    #[default]
    #[serde(other)]
    Registry,
}

/// Hugging Face generator/evaluator settings as sent by the front end.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostedModelSettings {
    pub deployment: Deployment,
    pub selected_model: Option<String>,
    pub api_key: Option<String>,
    pub generator_api_key: Option<String>,
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    #[serde(deserialize_with = "truthy_field")]
    pub evaluator_enabled: bool,
}

impl Default for HostedModelSettings {
    fn default() -> Self {
        let params = GenerationParams::default();
        Self {
            deployment: Deployment::default(),
            selected_model: None,
            api_key: None,
            generator_api_key: None,
            max_new_tokens: params.max_new_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
            evaluator_enabled: false,
        }
    }
}

impl HostedModelSettings {
    /// Parses settings leniently: unusable input yields defaults.
    pub fn from_value(value: &Value) -> Self {
        match Self::deserialize(value) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "Ignoring malformed huggingface settings");
                Self::default()
            }
        }
    }

    /// Selected model id, if non-blank.
    pub fn model(&self) -> Option<&str> {
        non_blank(self.selected_model.as_deref())
    }

    /// Key for the inference API. Falls back to the generator's key.
    pub fn api_token(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref()).or(non_blank(self.generator_api_key.as_deref()))
    }

    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            max_new_tokens: self.max_new_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            ..GenerationParams::default()
        }
    }
}

/// Which evaluator scores groundedness.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EvaluationBackend {
    /// The configured chat-completions oracle.
    #[default]
    Default,
    HostedModel(HostedModelSettings),
}

/// Normalized groundedness settings for one request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EvaluationSettings {
    pub enabled: bool,
    /// Extra guidance appended to the evaluator prompt. May be empty.
    pub prompt: String,
    pub backend: EvaluationBackend,
}

impl EvaluationSettings {
    /// Normalizes `evaluation.categories`.
    ///
    /// Anything that is neither a list nor a map disables evaluation.
    pub fn from_categories(categories: &Value) -> Self {
        let (category, huggingface) = match categories {
            Value::Array(items) => {
                let category = items.iter().find(|item| {
                    item.get("name").and_then(Value::as_str) == Some(GROUNDEDNESS_CATEGORY)
                });
                let huggingface = items
                    .iter()
                    .filter_map(|item| item.get("huggingface"))
                    .find(|hf| truthy(hf));
                (category, huggingface)
            }
            Value::Object(map) => (
                map.get(GROUNDEDNESS_CATEGORY),
                map.get("huggingface").filter(|hf| truthy(hf)),
            ),
            _ => (None, None),
        };

        let enabled = category
            .and_then(|c| c.get("isEnabled"))
            .is_some_and(truthy);
        let prompt = category
            .and_then(|c| c.get("prompt"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let backend = match huggingface.map(HostedModelSettings::from_value) {
            Some(settings) if settings.evaluator_enabled => EvaluationBackend::HostedModel(settings),
            _ => EvaluationBackend::Default,
        };

        Self {
            enabled,
            prompt,
            backend,
        }
    }

    /// Guidance for the evaluator, if any.
    pub fn guidance(&self) -> Option<&str> {
        non_blank(Some(self.prompt.as_str()))
    }
}

/// Which backend writes summaries.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GeneratorBackend {
    /// The configured chat model.
    #[default]
    Default,
    HostedModel(HostedModelSettings),
}

/// Normalized generator settings for one request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeneratorSettings {
    pub backend: GeneratorBackend,
    /// Caller-supplied key for the default backend. Server credentials are used when absent.
    pub api_key: Option<String>,
}

impl GeneratorSettings {
    /// Normalizes the request's `generator` object.
    pub fn from_value(generator: &Value) -> Self {
        let backend = match generator.get("generator").and_then(Value::as_str) {
            Some("huggingface") => GeneratorBackend::HostedModel(
                generator
                    .get("huggingface")
                    .map(HostedModelSettings::from_value)
                    .unwrap_or_default(),
            ),
            _ => GeneratorBackend::Default,
        };

        Self {
            backend,
            api_key: non_blank(generator.get("apiKey").and_then(Value::as_str)).map(str::to_string),
        }
    }
}

/// JSON truthiness: `false`, `null`, `0`, `""`, `[]` and `{}` are false.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn truthy_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Value::deserialize(deserializer).map(|v| truthy(&v))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
