//! Response data model.
//!
//! Field names follow the JSON the front end reads: `source_count` and `relevance_score` are
//! snake_case while `articleScores` and `crossAttributeScores` are camelCase.


use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// Insertion-ordered so JSON keys follow processing order. Re-inserting a key keeps its slot.

/// Article id -> groundedness score.
pub type ArticleScores = IndexMap<String, f64>;

/// Other attribute -> (that attribute's summary id -> relevance score).
pub type CrossAttributeScores = IndexMap<String, IndexMap<String, f64>>;

/// Attribute -> its assembled results, in processing order.
pub type ResultSet = IndexMap<String, AttributeResults>;

/// One scraped source kept for an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    /// Display snippet of the extracted text.
    pub content: String,
    pub url: String,
    pub relevance_score: f64,
}

/// One generated claim for an attribute, with its scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryPoint {
    pub id: String,
    pub text: String,
    pub confidence: f64,
    pub source_count: usize,

    #[serde(rename = "articleScores", default)]
    pub article_scores: ArticleScores,

    #[serde(
        rename = "crossAttributeScores",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub cross_attribute_scores: CrossAttributeScores,

    /// Aggregate groundedness. Not computed by this service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groundedness: Option<f64>,
}

impl SummaryPoint {
    pub fn new(id: String, text: String, confidence: f64, source_count: usize) -> Self {
        Self {
            id,
            text,
            confidence,
            source_count,
            article_scores: ArticleScores::new(),
            cross_attribute_scores: CrossAttributeScores::new(),
            groundedness: None,
        }
    }
}

/// Summaries and articles produced for one attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeResults {
    pub summary: Vec<SummaryPoint>,
    pub articles: Vec<Article>,
}
