use std::sync::Arc;

use crate::research::ResearchPipeline;
use crate::registry::{ModelHub, ModelRegistry};

/// Shared handler state. The registry is the only piece mutated across requests.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ResearchPipeline>,

    pub registry: Arc<ModelRegistry>,

    pub hub: Arc<dyn ModelHub>,

    /// Origin allowed by the CORS layer.
    pub cors_origin: String,
}

impl AppState {
    pub fn new(
        pipeline: ResearchPipeline,
        registry: Arc<ModelRegistry>,
        hub: Arc<dyn ModelHub>,
        cors_origin: impl Into<String>,
    ) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            registry,
            hub,
            cors_origin: cors_origin.into(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("pipeline", &self.pipeline)
            .field("registry", &self.registry)
            .field("cors_origin", &self.cors_origin)
            .finish_non_exhaustive()
    }
}
