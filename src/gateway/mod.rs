//! HTTP gateway (Axum) for research requests and model registry management.

pub mod error;
pub mod handler;
pub mod models;
pub mod payload;
pub mod state;


use std::any::Any;

use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    response::Response,
    routing::{get, post},
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

pub use error::GatewayError;
pub use handler::search_handler;
pub use models::{load_model_handler, models_handler, unload_model_handler};
pub use state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origin);

    Router::new()
        .route("/healthz", get(health_handler))
        .route("/api/search", post(search_handler))
        .route("/api/huggingface/models", get(models_handler))
        .route("/api/huggingface/load", post(load_model_handler))
        .route("/api/huggingface/unload", post(unload_model_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// CORS for the single front-end origin. An unparsable origin leaves cross-origin calls blocked.
fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            warn!(origin, error = %e, "Invalid CORS origin, cross-origin requests disabled");
            layer
        }
    }
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(details = %details, "Handler panicked");
    error::internal_error(details)
}
