use thiserror::Error;

use crate::registry::RegistryError;

/// Failures in the search, extraction and generation collaborators.
///
/// The pipeline logs these and carries on with less data; none reach the HTTP caller.
#[derive(Debug, Error)]
pub enum ResearchError {
    /// Credentials for a backend are missing from configuration.
    #[error("{backend} search is not configured: missing {missing}")]
    NotConfigured {
        backend: &'static str,
        missing: &'static str,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The summary model failed or returned something unusable.
    #[error("summary generation failed: {reason}")]
    Generation { reason: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ResearchError {
    pub fn generation(reason: impl ToString) -> Self {
        Self::Generation {
            reason: reason.to_string(),
        }
    }
}
