//! Registry of Hugging Face models the service has been asked to use.
//!
//! Models are never run in-process. "Loading" verifies the id against the hub and records it so
//! later generation and evaluation requests can refer to it; inference goes through
//! [`ModelHub::generate`]. The registry is the only state that outlives a request.

pub mod error;
pub mod hub;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::RegistryError;
pub use hub::HfHub;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockModelHub;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::info;

/// Role a registered model plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Generator,
    Evaluator,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generator => write!(f, "generator"),
            Self::Evaluator => write!(f, "evaluator"),
        }
    }
}

impl std::str::FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "generator" => Ok(Self::Generator),
            "evaluator" => Ok(Self::Evaluator),
            _ => Err(format!("unknown model type: {}", s)),
        }
    }
}

/// Sampling parameters for hub text generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub repetition_penalty: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 512,
            temperature: 0.7,
            top_p: 0.95,
            repetition_penalty: 1.1,
        }
    }
}

/// Remote model hub: existence checks and hosted text generation.
#[async_trait]
pub trait ModelHub: Send + Sync {
    /// Returns `true` if `model` exists on the hub.
    async fn model_exists(&self, model: &str) -> Result<bool, RegistryError>;

    /// Generates a completion for `prompt`. `token` overrides the hub's default credentials.
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        token: Option<&str>,
        params: &GenerationParams,
    ) -> Result<String, RegistryError>;
}

/// Entry returned by [`ModelRegistry::list`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelListing {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ModelKind,
    pub is_loaded: bool,
}

/// Result of a successful [`ModelRegistry::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    AlreadyLoaded,
}

impl LoadOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Loaded => "Model loaded successfully",
            Self::AlreadyLoaded => "Model already loaded",
        }
    }
}

/// Process-lifetime set of registered `(kind, model id)` pairs.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: RwLock<HashSet<(ModelKind, String)>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `model` as `kind` after confirming it exists on `hub`.
    ///
    /// The lock is not held across the hub call. Two concurrent loads of the same id both verify
    /// and the second insert wins, which leaves the same entry.
    pub async fn load(
        &self,
        hub: &dyn ModelHub,
        model: &str,
        kind: ModelKind,
    ) -> Result<LoadOutcome, RegistryError> {
        if self.is_loaded(kind, model) {
            info!(model, %kind, "Model already loaded");
            return Ok(LoadOutcome::AlreadyLoaded);
        }

        if !hub.model_exists(model).await? {
            return Err(RegistryError::NotFound {
                model: model.to_string(),
            });
        }

        self.models.write().insert((kind, model.to_string()));
        info!(model, %kind, registered = self.len(), "Model registered");
        Ok(LoadOutcome::Loaded)
    }

    /// Removes a registration. Returns `false` if it was not present.
    pub fn unload(&self, model: &str, kind: ModelKind) -> bool {
        let removed = self
            .models
            .write()
            .remove(&(kind, model.to_string()));
        if removed {
            info!(model, %kind, "Model unloaded");
        }
        removed
    }

    pub fn is_loaded(&self, kind: ModelKind, model: &str) -> bool {
        self.models.read().contains(&(kind, model.to_string()))
    }

    /// Registered models, optionally filtered by kind, ordered by kind then id.
    pub fn list(&self, kind: Option<ModelKind>) -> Vec<ModelListing> {
        let mut listings: Vec<ModelListing> = self
            .models
            .read()
            .iter()
            .filter(|(k, _)| kind.is_none_or(|wanted| *k == wanted))
            .map(|(k, id)| ModelListing {
                id: id.clone(),
                kind: *k,
                is_loaded: true,
            })
            .collect();
        listings.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.id.cmp(&b.id)));
        listings
    }

    pub fn len(&self) -> usize {
        self.models.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.read().is_empty()
    }
}
