use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{ContentExtractor, SearchBackend, SearchSettings, SummaryGenerator, SummaryRequest};
use crate::assembler::{AttributeInput, CandidatePage, ResultAssembler};
use crate::constants::{DEFAULT_MAX_ARTICLES, DEFAULT_RELEVANCE_SCORE};
use crate::evaluation::{EvaluationSettings, GeneratorSettings};
use crate::model::ResultSet;

/// One validated research request.
#[derive(Debug, Clone, Default)]
pub struct ResearchRequest {
    pub query: String,
    pub attributes: Vec<String>,
    pub search: SearchSettings,
    pub generator: GeneratorSettings,
    pub evaluation: EvaluationSettings,
}

/// Runs search, extraction, summarization and scoring for every attribute of a request.
///
/// Attributes are processed one after another and every collaborator call is awaited in turn,
/// so ids and output order follow the request.
#[derive(Clone)]
pub struct ResearchPipeline {
    search: Arc<dyn SearchBackend>,
    extractor: Arc<dyn ContentExtractor>,
    generator: Arc<dyn SummaryGenerator>,
    assembler: ResultAssembler,
    max_articles: usize,
}

impl ResearchPipeline {
    pub fn new(
        search: Arc<dyn SearchBackend>,
        extractor: Arc<dyn ContentExtractor>,
        generator: Arc<dyn SummaryGenerator>,
        assembler: ResultAssembler,
    ) -> Self {
        Self {
            search,
            extractor,
            generator,
            assembler,
            max_articles: DEFAULT_MAX_ARTICLES,
        }
    }

    pub fn with_max_articles(mut self, max_articles: usize) -> Self {
        self.max_articles = max_articles.max(1);
        self
    }

    /// Results keyed by attribute. Attributes with no extractable content are left out.
    #[instrument(skip_all, fields(query = %request.query, attributes = request.attributes.len()))]
    pub async fn run(&self, request: &ResearchRequest) -> ResultSet {
        let mut results = ResultSet::new();

        for attribute in &request.attributes {
            let pages = self.gather_pages(&request.query, attribute, &request.search).await;
            if pages.is_empty() {
                warn!(attribute = %attribute, "No content found for attribute");
                continue;
            }

            let links: Vec<String> = pages.iter().map(|p| p.url.clone()).collect();
            let summaries = self
                .generator
                .summarize(
                    &SummaryRequest {
                        query: &request.query,
                        attribute,
                        article_links: &links,
                    },
                    &request.generator,
                )
                .await;

            let assembled = self
                .assembler
                .assemble_attribute(
                    AttributeInput {
                        query: &request.query,
                        attribute,
                        pages: &pages,
                        summaries,
                        relevance_cutoff: request.search.relevance_cutoff,
                    },
                    &request.evaluation,
                )
                .await;
            results.insert(attribute.clone(), assembled);
        }

        self.assembler.finalize(&mut results).await;

        info!(processed = results.len(), "Research complete");
        results
    }

    /// Extracts up to `max_articles` pages from the attribute's search results, skipping URLs
    /// that yield no text.
    async fn gather_pages(
        &self,
        query: &str,
        attribute: &str,
        settings: &SearchSettings,
    ) -> Vec<CandidatePage> {
        let urls = match self.search.search(query, attribute, settings).await {
            Ok(urls) => urls,
            Err(e) => {
                warn!(attribute, error = %e, "Search failed");
                Vec::new()
            }
        };

        let mut pages = Vec::new();
        for url in urls {
            if pages.len() >= self.max_articles {
                break;
            }
            match self.extractor.url_to_text(&url).await {
                Some(page) => pages.push(CandidatePage {
                    url,
                    title: page.title,
                    text: page.text,
                    relevance_score: DEFAULT_RELEVANCE_SCORE,
                }),
                None => warn!(attribute, url = %url, "No content extracted"),
            }
        }
        pages
    }
}

impl std::fmt::Debug for ResearchPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchPipeline")
            .field("max_articles", &self.max_articles)
            .field("assembler", &self.assembler)
            .finish_non_exhaustive()
    }
}
