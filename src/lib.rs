//! Factcheck library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Request flow
//! - [`ResearchPipeline`] - search, extraction and summarization per attribute
//! - [`ResultAssembler`] - articles, groundedness and default scores, cross-attribute relevance
//! - [`gateway::create_router`] - the HTTP API
//!
//! ## Scoring
//! - [`ScoringOracle`] - the LLM seam both scorers call through
//! - [`compute_groundedness`], [`compute_cross_attribute_scores`]
//!
//! ## Models
//! - [`ModelRegistry`], [`ModelHub`] - Hugging Face model bookkeeping and hosted inference
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod assembler;
pub mod config;
pub mod constants;
pub mod evaluation;
pub mod gateway;
pub mod model;
pub mod oracle;
pub mod registry;
pub mod research;
pub mod scoring;

pub use assembler::{CandidatePage, EvaluatorError, ResultAssembler};
pub use config::{Config, ConfigError, OracleAuth};
pub use evaluation::{EvaluationBackend, EvaluationSettings, GeneratorBackend, GeneratorSettings};
pub use model::{Article, AttributeResults, ResultSet, SummaryPoint};
pub use oracle::{ChatCompletionsOracle, HostedModelOracle, OracleError, ScoringOracle};
pub use registry::{HfHub, ModelHub, ModelKind, ModelRegistry, RegistryError};
pub use research::{
    ChatSummaryGenerator, HtmlExtractor, ResearchError, ResearchPipeline, ResearchRequest,
    WebSearch,
};
pub use scoring::{compute_cross_attribute_scores, compute_groundedness};

#[cfg(any(test, feature = "mock"))]
pub use oracle::MockOracle;
#[cfg(any(test, feature = "mock"))]
pub use registry::MockModelHub;
#[cfg(any(test, feature = "mock"))]
pub use research::{MockExtractor, MockSearch, MockSummaryGenerator};
