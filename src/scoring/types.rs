use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::constants::{FALLBACK_SCORE, MAX_SCORE, MIN_SCORE};
use crate::oracle::ScoringOracle;

/// URL -> groundedness score for one summary point.
pub type GroundednessScores = BTreeMap<String, f64>;

/// How an evaluator's score map is located in its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreMapFormat {
    /// The whole completion is a JSON object.
    #[default]
    Strict,
    /// The object is embedded in prose; parse the first `{` to the last `}`.
    Embedded,
}

impl fmt::Display for ScoreMapFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreMapFormat::Strict => write!(f, "strict"),
            ScoreMapFormat::Embedded => write!(f, "embedded"),
        }
    }
}

/// An oracle paired with the output format it produces.
#[derive(Clone)]
pub struct Evaluator {
    oracle: Arc<dyn ScoringOracle>,
    format: ScoreMapFormat,
}

impl Evaluator {
    pub fn new(oracle: Arc<dyn ScoringOracle>, format: ScoreMapFormat) -> Self {
        Self { oracle, format }
    }

    pub fn oracle(&self) -> &dyn ScoringOracle {
        self.oracle.as_ref()
    }

    pub fn format(&self) -> ScoreMapFormat {
        self.format
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

/// Everything a groundedness call needs about one summary point.
#[derive(Debug, Clone, Copy)]
pub struct GroundednessInput<'a> {
    pub summary: &'a str,
    pub article_urls: &'a [String],
    pub attribute: &'a str,
    pub query: &'a str,
    /// Caller-supplied evaluation prompt. Ignored when blank.
    pub guidance: Option<&'a str>,
}

/// Groundedness range policy: values outside `[0, 5]` are invalid and become the fallback.
#[inline]
pub fn zero_out_of_range(value: Option<f64>) -> f64 {
    match value {
        Some(v) if (MIN_SCORE..=MAX_SCORE).contains(&v) => v,
        _ => FALLBACK_SCORE,
    }
}

/// Relevance range policy: clamp into `[0, 5]`, then round to one decimal.
#[inline]
pub fn clamp_and_round(value: f64) -> f64 {
    round_one_decimal(value.clamp(MIN_SCORE, MAX_SCORE))
}

/// Rounds to one decimal on the exact binary value, ties to even: 2.25 -> 2.2, 1.15 -> 1.1.
pub fn round_one_decimal(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

/// Every URL mapped to the fallback score.
pub fn fallback_scores(urls: &[String]) -> GroundednessScores {
    urls.iter().map(|url| (url.clone(), FALLBACK_SCORE)).collect()
}
