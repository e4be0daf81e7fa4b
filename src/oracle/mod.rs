//! Scoring oracle client.
//!
//! An oracle takes a system/user prompt pair and returns free text. Everything that turns that
//! text into scores lives in [`parse`] and the scorers; the oracle itself knows nothing about
//! score ranges.

pub mod client;
pub mod error;
pub mod hosted;
pub mod parse;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use client::ChatCompletionsOracle;
pub use error::{OracleError, ScoreParseError};
pub use hosted::HostedModelOracle;
pub use parse::{extract_json_object, parse_scalar_score, parse_score_map};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockOracle;

use async_trait::async_trait;
use std::fmt;

/// What a request is scoring. Used for log fields and by test doubles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoringPurpose {
    Groundedness,
    Relevance,
}

impl fmt::Display for ScoringPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Groundedness => write!(f, "groundedness"),
            Self::Relevance => write!(f, "relevance"),
        }
    }
}

/// One prompt sent to an oracle.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleRequest {
    pub purpose: ScoringPurpose,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl OracleRequest {
    /// System and user prompt joined for backends that take a single prompt string.
    pub fn flattened_prompt(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

/// A text-completion backend used for scoring.
#[async_trait]
pub trait ScoringOracle: Send + Sync {
    /// Sends one prompt and returns the raw completion text.
    async fn complete(&self, request: &OracleRequest) -> Result<String, OracleError>;
}
