//! Request and response bodies of the HTTP API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::ResultSet;
use crate::registry::ModelListing;

/// Local time with microseconds and no offset, e.g. `2024-05-01T12:30:00.123456`.
pub fn timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Body of `POST /api/search`. Fields are optional so presence is checked by the handler.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchRequestBody {
    pub query: Option<String>,
    pub attributes: Option<Vec<String>>,
    pub browser: Option<BrowserChoice>,
    pub generator: Value,
    pub evaluation: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BrowserChoice {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Per-field detail of a 400 for missing parameters. `null` means the field was present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MissingFields {
    pub query: Option<&'static str>,
    pub attributes: Option<&'static str>,
}

impl MissingFields {
    pub fn new(query_missing: bool, attributes_missing: bool) -> Self {
        let required = |missing: bool| missing.then_some("Required");
        Self {
            query: required(query_missing),
            attributes: required(attributes_missing),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub status: &'static str,
    pub query: String,
    pub timestamp: String,
    pub results: ResultSet,
    pub metadata: SearchMetadata,
}

#[derive(Debug, Serialize)]
pub struct SearchMetadata {
    pub browser: String,
    pub total_sources: usize,
    pub processed_attributes: usize,
    pub processing_time: String,
}

/// Body of the model load and unload endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ModelRequestBody {
    pub model_name: Option<String>,
    pub model_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ModelsQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub status: &'static str,
    pub models: Vec<ModelListing>,
}

#[derive(Debug, Serialize)]
pub struct ModelActionResponse {
    pub status: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
}
