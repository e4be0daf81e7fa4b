use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::evaluation::{EvaluationSettings, GeneratorSettings};
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{
    MissingFields, SearchMetadata, SearchRequestBody, SearchResponse, timestamp,
};
use crate::gateway::state::AppState;
use crate::research::{ResearchRequest, SearchSettings, SearchSystem};

/// Browser used when the request names none.
pub const DEFAULT_BROWSER: &str = "google";

/// `POST /api/search`: researches every attribute of the query.
#[instrument(skip(state, body), fields(request_id = %Uuid::new_v4()))]
pub async fn search_handler(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SearchResponse>, GatewayError> {
    let Json(body) = body.map_err(|e| GatewayError::InvalidBody(e.body_text()))?;
    let (request, browser) = research_request(body)?;

    info!(
        query = %request.query,
        browser = %browser,
        attributes = ?request.attributes,
        "Processing search request"
    );

    let results = state.pipeline.run(&request).await;
    let processed = results.len();
    let finished = timestamp();

    Ok(Json(SearchResponse {
        status: "success",
        query: request.query,
        timestamp: finished.clone(),
        results,
        metadata: SearchMetadata {
            browser,
            total_sources: processed,
            processed_attributes: processed,
            processing_time: finished,
        },
    }))
}

/// Validates a search body and normalizes its settings. Also returns the browser name as sent.
pub(crate) fn research_request(body: Value) -> Result<(ResearchRequest, String), GatewayError> {
    let body: SearchRequestBody =
        serde_json::from_value(body).map_err(|e| GatewayError::InvalidBody(e.to_string()))?;

    let query = body.query.filter(|q| !q.is_empty());
    let attributes = body.attributes.filter(|a| !a.is_empty());
    let (query, attributes) = match (query, attributes) {
        (Some(query), Some(attributes)) => (query, attributes),
        (query, attributes) => {
            return Err(GatewayError::MissingParameters(MissingFields::new(
                query.is_none(),
                attributes.is_none(),
            )));
        }
    };

    let browser = body
        .browser
        .and_then(|b| b.kind)
        .unwrap_or_else(|| DEFAULT_BROWSER.to_string());
    let categories = body
        .evaluation
        .get("categories")
        .cloned()
        .unwrap_or(Value::Null);

    let request = ResearchRequest {
        query,
        attributes,
        search: SearchSettings::new(SearchSystem::from_browser(&browser)),
        generator: GeneratorSettings::from_value(&body.generator),
        evaluation: EvaluationSettings::from_categories(&categories),
    };
    Ok((request, browser))
}
