//! Builds per-attribute results from extracted pages and generated summaries.
//!
//! Each summary point gets one score per kept article: from the groundedness evaluator when
//! evaluation is enabled, otherwise from a fixed descending default. Once every attribute is
//! assembled, [`ResultAssembler::finalize`] adds cross-attribute relevance.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::EvaluatorError;

use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::constants::{
    DEFAULT_SCORE_BASE, DEFAULT_SCORE_STEP, FALLBACK_SCORE, MAX_SCORE, MISSING_ARTICLE_SCORE,
    SNIPPET_CHARS, SUMMARY_CONFIDENCE, article_id, summary_id,
};
use crate::evaluation::{Deployment, EvaluationBackend, EvaluationSettings};
use crate::model::{Article, ArticleScores, AttributeResults, ResultSet, SummaryPoint};
use crate::oracle::{HostedModelOracle, ScoringOracle};
use crate::registry::{ModelHub, ModelKind, ModelRegistry};
use crate::scoring::{
    Evaluator, GroundednessInput, ScoreMapFormat, compute_cross_attribute_scores,
    compute_groundedness,
};

/// One extracted page offered to an attribute, in search order.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePage {
    pub url: String,
    pub title: String,
    pub text: String,
    pub relevance_score: f64,
}

/// Inputs for assembling one attribute.
#[derive(Debug, Clone)]
pub struct AttributeInput<'a> {
    pub query: &'a str,
    pub attribute: &'a str,
    pub pages: &'a [CandidatePage],
    pub summaries: Vec<String>,
    pub relevance_cutoff: f64,
}

/// Assembles attribute results and owns the oracles used to score them.
#[derive(Clone)]
pub struct ResultAssembler {
    default_oracle: Arc<dyn ScoringOracle>,
    hub: Arc<dyn ModelHub>,
    registry: Arc<ModelRegistry>,
    cap_default_scores: bool,
}

impl ResultAssembler {
    pub fn new(
        default_oracle: Arc<dyn ScoringOracle>,
        hub: Arc<dyn ModelHub>,
        registry: Arc<ModelRegistry>,
    ) -> Self {
        Self {
            default_oracle,
            hub,
            registry,
            cap_default_scores: false,
        }
    }

    /// Caps disabled-evaluation defaults at the maximum score.
    pub fn with_capped_defaults(mut self, cap: bool) -> Self {
        self.cap_default_scores = cap;
        self
    }

    /// Picks the groundedness evaluator for `backend`.
    pub fn resolve_evaluator(
        &self,
        backend: &EvaluationBackend,
    ) -> Result<Evaluator, EvaluatorError> {
        let settings = match backend {
            EvaluationBackend::Default => {
                return Ok(Evaluator::new(
                    self.default_oracle.clone(),
                    ScoreMapFormat::Strict,
                ));
            }
            EvaluationBackend::HostedModel(settings) => settings,
        };

        let model = settings.model().ok_or(EvaluatorError::MissingModel)?;
        let token = match settings.deployment {
            Deployment::Api => Some(settings.api_token().map(str::to_string).ok_or_else(|| {
                EvaluatorError::MissingApiKey {
                    model: model.to_string(),
                }
            })?),
            Deployment::Registry => {
                if !self.registry.is_loaded(ModelKind::Evaluator, model) {
                    return Err(EvaluatorError::NotLoaded {
                        model: model.to_string(),
                    });
                }
                None
            }
        };

        let oracle = HostedModelOracle::new(self.hub.clone(), model, token);
        Ok(Evaluator::new(Arc::new(oracle), ScoreMapFormat::Embedded))
    }

    /// Builds the articles and scored summary points for one attribute.
    #[instrument(skip_all, fields(attribute = input.attribute, pages = input.pages.len()))]
    pub async fn assemble_attribute(
        &self,
        input: AttributeInput<'_>,
        settings: &EvaluationSettings,
    ) -> AttributeResults {
        let articles = build_articles(input.pages, input.relevance_cutoff);

        let evaluator = if settings.enabled {
            match self.resolve_evaluator(&settings.backend) {
                Ok(evaluator) => Some(Ok(evaluator)),
                Err(e) => {
                    error!(error = %e, "Groundedness evaluator unavailable");
                    Some(Err(e))
                }
            }
        } else {
            None
        };

        let candidate_urls: Vec<String> = input.pages.iter().map(|p| p.url.clone()).collect();
        let mut summary = Vec::with_capacity(input.summaries.len());

        for (i, text) in input.summaries.into_iter().enumerate() {
            let article_scores: ArticleScores = match &evaluator {
                Some(Ok(evaluator)) => {
                    let groundedness_input = GroundednessInput {
                        summary: &text,
                        article_urls: &candidate_urls,
                        attribute: input.attribute,
                        query: input.query,
                        guidance: settings.guidance(),
                    };
                    let by_url = compute_groundedness(evaluator, &groundedness_input).await;
                    articles
                        .iter()
                        .map(|article| {
                            let score = by_url
                                .get(&article.url)
                                .copied()
                                .unwrap_or(MISSING_ARTICLE_SCORE);
                            (article.id.clone(), score)
                        })
                        .collect()
                }
                Some(Err(_)) => articles
                    .iter()
                    .map(|article| (article.id.clone(), FALLBACK_SCORE))
                    .collect(),
                None => default_article_scores(&articles, self.cap_default_scores),
            };

            let mut point =
                SummaryPoint::new(summary_id(i), text, SUMMARY_CONFIDENCE, articles.len());
            point.article_scores = article_scores;
            summary.push(point);
        }

        debug!(
            articles = articles.len(),
            summaries = summary.len(),
            "Attribute assembled"
        );
        AttributeResults { summary, articles }
    }

    /// Adds cross-attribute relevance once all attributes are assembled.
    pub async fn finalize(&self, results: &mut ResultSet) {
        if results.len() >= 2 {
            compute_cross_attribute_scores(self.default_oracle.as_ref(), results).await;
        }
    }
}

impl std::fmt::Debug for ResultAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultAssembler")
            .field("cap_default_scores", &self.cap_default_scores)
            .finish_non_exhaustive()
    }
}

/// Pages above `relevance_cutoff` as articles. Ids keep the page's position.
pub fn build_articles(pages: &[CandidatePage], relevance_cutoff: f64) -> Vec<Article> {
    pages
        .iter()
        .enumerate()
        .filter(|(_, page)| page.relevance_score > relevance_cutoff)
        .map(|(i, page)| Article {
            id: article_id(i),
            title: page.title.clone(),
            content: snippet(&page.text),
            url: page.url.clone(),
            relevance_score: page.relevance_score,
        })
        .collect()
}

/// Descending scores used when evaluation is disabled: `3.0 + 0.5 * (count - index)`.
///
/// The first of five articles gets 5.5. With `cap` set, scores are limited to 5.0.
pub fn default_article_scores(articles: &[Article], cap: bool) -> ArticleScores {
    let count = articles.len();
    articles
        .iter()
        .enumerate()
        .map(|(j, article)| {
            let score = DEFAULT_SCORE_BASE + DEFAULT_SCORE_STEP * (count - j) as f64;
            let score = if cap { score.min(MAX_SCORE) } else { score };
            (article.id.clone(), score)
        })
        .collect()
}

/// Display snippet: the first characters of the extracted text.
pub fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_CHARS).collect()
}
