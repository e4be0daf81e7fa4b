//! Hugging Face model registry endpoints.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use tracing::{info, instrument};

use crate::gateway::error::GatewayError;
use crate::gateway::payload::{ModelActionResponse, ModelRequestBody, ModelsQuery, ModelsResponse};
use crate::gateway::state::AppState;
use crate::registry::ModelKind;

/// `GET /api/huggingface/models?type=generator|evaluator`.
#[instrument(skip(state))]
pub async fn models_handler(
    State(state): State<AppState>,
    Query(query): Query<ModelsQuery>,
) -> Result<Json<ModelsResponse>, GatewayError> {
    let kind = query
        .kind
        .as_deref()
        .map(str::parse::<ModelKind>)
        .transpose()
        .map_err(GatewayError::InvalidModelType)?;

    Ok(Json(ModelsResponse {
        status: "success",
        models: state.registry.list(kind),
    }))
}

/// `POST /api/huggingface/load`: verifies the model on the hub and registers it.
#[instrument(skip(state, body))]
pub async fn load_model_handler(
    State(state): State<AppState>,
    body: Result<Json<ModelRequestBody>, JsonRejection>,
) -> Result<Json<ModelActionResponse>, GatewayError> {
    let (model, kind) = model_target(body)?;

    let outcome = state.registry.load(state.hub.as_ref(), &model, kind).await?;
    info!(model = %model, %kind, outcome = outcome.message(), "Load request handled");

    Ok(Json(ModelActionResponse {
        status: "success",
        message: outcome.message(),
        model_id: Some(model),
    }))
}

/// `POST /api/huggingface/unload`. Unknown models get a warning, not an error.
#[instrument(skip(state, body))]
pub async fn unload_model_handler(
    State(state): State<AppState>,
    body: Result<Json<ModelRequestBody>, JsonRejection>,
) -> Result<Json<ModelActionResponse>, GatewayError> {
    let (model, kind) = model_target(body)?;

    let response = if state.registry.unload(&model, kind) {
        ModelActionResponse {
            status: "success",
            message: "Model unloaded successfully",
            model_id: None,
        }
    } else {
        ModelActionResponse {
            status: "warning",
            message: "Model not found in cache",
            model_id: None,
        }
    };
    Ok(Json(response))
}

/// Model id and kind from a load/unload body. The kind defaults to generator.
fn model_target(
    body: Result<Json<ModelRequestBody>, JsonRejection>,
) -> Result<(String, ModelKind), GatewayError> {
    let Json(body) = body.map_err(|e| GatewayError::InvalidBody(e.body_text()))?;

    let model = body
        .model_name
        .filter(|name| !name.trim().is_empty())
        .ok_or(GatewayError::ModelNameRequired)?;
    let kind = match body.model_type.as_deref() {
        Some(kind) => kind.parse().map_err(GatewayError::InvalidModelType)?,
        None => ModelKind::default(),
    };
    Ok((model, kind))
}
