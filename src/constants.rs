//! Cross-cutting, shared constants.
//!
//! Score bounds and the default-score formula are read by the scorers, the assembler and the
//! gateway tests. Keep them here so the front end's color thresholds have a single source.

/// Lowest score any scorer may emit.
pub const MIN_SCORE: f64 = 0.0;

/// Highest score any scorer may emit.
pub const MAX_SCORE: f64 = 5.0;

/// Score used when a scorer degrades (transport failure, malformed output, invalid value).
pub const FALLBACK_SCORE: f64 = 0.0;

/// Base of the descending default used when groundedness evaluation is disabled.
pub const DEFAULT_SCORE_BASE: f64 = 3.0;

/// Step of the descending default: `base + step * (count - index)`.
pub const DEFAULT_SCORE_STEP: f64 = 0.5;

/// Article score used when an evaluator result does not mention an article's URL.
pub const MISSING_ARTICLE_SCORE: f64 = 3.0;

/// Placeholder confidence attached to every summary point.
pub const SUMMARY_CONFIDENCE: f64 = 0.9;

/// Relevance score assigned to every extracted article.
pub const DEFAULT_RELEVANCE_SCORE: f64 = 0.85;

/// Articles at or below this relevance are dropped from an attribute.
pub const DEFAULT_RELEVANCE_CUTOFF: f64 = 0.6;

/// Number of search results requested per attribute.
pub const DEFAULT_NUM_RESULTS: usize = 10;

/// Maximum number of extracted articles kept per attribute.
pub const DEFAULT_MAX_ARTICLES: usize = 5;

/// Characters of extracted text shown as an article's display snippet.
pub const SNIPPET_CHARS: usize = 200;

/// Prefix of positional article ids (`article_0`, `article_1`, ...).
pub const ARTICLE_ID_PREFIX: &str = "article_";

/// Prefix of positional summary ids (`summary_0`, `summary_1`, ...).
pub const SUMMARY_ID_PREFIX: &str = "summary_";

/// Evaluation category that toggles groundedness scoring.
pub const GROUNDEDNESS_CATEGORY: &str = "Answer Groundedness";

/// Returns the positional article id for `index`.
pub fn article_id(index: usize) -> String {
    format!("{ARTICLE_ID_PREFIX}{index}")
}

/// Returns the positional summary id for `index`.
pub fn summary_id(index: usize) -> String {
    format!("{SUMMARY_ID_PREFIX}{index}")
}
