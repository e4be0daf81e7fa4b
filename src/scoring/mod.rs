//! Groundedness and cross-attribute relevance scoring.
//!
//! Both scorers degrade to `0` instead of failing. Out-of-range groundedness values are zeroed;
//! out-of-range relevance values are clamped.

pub mod groundedness;
pub mod relevance;
pub mod types;

#[cfg(test)]
mod tests;

pub use groundedness::compute_groundedness;
pub use relevance::{compute_cross_attribute_scores, score_summary_pair};
pub use types::{Evaluator, GroundednessInput, GroundednessScores, ScoreMapFormat};
