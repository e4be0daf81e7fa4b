use thiserror::Error;

/// Why the requested groundedness evaluator cannot be used.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvaluatorError {
    #[error("Model name required for HuggingFace evaluation")]
    MissingModel,

    #[error("API key required for HuggingFace API evaluation of {model}")]
    MissingApiKey { model: String },

    #[error("Evaluator model {model} not loaded. Please load it first.")]
    NotLoaded { model: String },
}
