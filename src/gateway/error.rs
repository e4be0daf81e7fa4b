use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use super::payload::{MissingFields, timestamp};
use crate::registry::RegistryError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Missing required parameters")]
    MissingParameters(MissingFields),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Model name is required")]
    ModelNameRequired,

    #[error("{0}")]
    InvalidModelType(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            GatewayError::MissingParameters(fields) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Missing required parameters",
                    "details": fields,
                })),
            )
                .into_response(),
            GatewayError::InvalidBody(details) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Invalid request body",
                    "details": details,
                    "timestamp": timestamp(),
                })),
            )
                .into_response(),
            GatewayError::ModelNameRequired | GatewayError::InvalidModelType(_) => {
                model_error(StatusCode::BAD_REQUEST, self.to_string())
            }
            GatewayError::Registry(e) => {
                error!(error = %e, "Model registry request failed");
                model_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}

/// `{status:"error", message}` body used by the model endpoints.
fn model_error(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(json!({
            "status": "error",
            "message": message,
        })),
    )
        .into_response()
}

/// 500 body returned for caught panics.
pub(super) fn internal_error(details: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Internal server error",
            "details": details,
            "timestamp": timestamp(),
        })),
    )
        .into_response()
}
