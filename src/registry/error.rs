use thiserror::Error;

use super::ModelKind;

/// Errors from the model hub or the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The hub has no model with this id.
    #[error("Model {model} not found on HuggingFace")]
    NotFound { model: String },

    /// A model was used before being loaded.
    #[error("{kind} model {model} not loaded. Please load it first.")]
    NotLoaded { model: String, kind: ModelKind },

    /// Inference API call needs a token and none was supplied.
    #[error("HuggingFace API token required for {model}")]
    MissingToken { model: String },

    /// Transport failure talking to the hub.
    #[error("hub request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The hub answered with a non-success status.
    #[error("hub returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}
