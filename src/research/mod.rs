//! Collaborators that gather the material the scorers work on: web search, article text
//! extraction and summary generation, plus the per-request pipeline that drives them.

pub mod error;
pub mod extract;
pub mod pipeline;
pub mod search;
pub mod summarize;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::ResearchError;
pub use extract::HtmlExtractor;
pub use pipeline::{ResearchPipeline, ResearchRequest};
pub use search::WebSearch;
pub use summarize::ChatSummaryGenerator;

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockExtractor, MockSearch, MockSummaryGenerator};

use async_trait::async_trait;
use std::fmt;

use crate::constants::{DEFAULT_NUM_RESULTS, DEFAULT_RELEVANCE_CUTOFF};
use crate::evaluation::GeneratorSettings;

/// Web search provider selected by the request's `browser.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchSystem {
    #[default]
    Google,
    Bing,
}

impl SearchSystem {
    /// Maps a browser name to a provider. Unknown names use Google.
    pub fn from_browser(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("bing") {
            Self::Bing
        } else {
            Self::Google
        }
    }
}

impl fmt::Display for SearchSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Google => write!(f, "google"),
            Self::Bing => write!(f, "bing"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSettings {
    pub system: SearchSystem,
    pub num_results: usize,
    pub relevance_cutoff: f64,
}

impl SearchSettings {
    pub fn new(system: SearchSystem) -> Self {
        Self {
            system,
            num_results: DEFAULT_NUM_RESULTS,
            relevance_cutoff: DEFAULT_RELEVANCE_CUTOFF,
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::new(SearchSystem::default())
    }
}

/// Text pulled out of one web page.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPage {
    pub title: String,
    pub text: String,
}

/// Input for one attribute's summary.
#[derive(Debug, Clone, Copy)]
pub struct SummaryRequest<'a> {
    pub query: &'a str,
    pub attribute: &'a str,
    pub article_links: &'a [String],
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Candidate article URLs for `attribute` of `query`, best first.
    async fn search(
        &self,
        query: &str,
        attribute: &str,
        settings: &SearchSettings,
    ) -> Result<Vec<String>, ResearchError>;
}

#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Fetches `url` and extracts its text. `None` when nothing usable was found.
    async fn url_to_text(&self, url: &str) -> Option<ExtractedPage>;
}

#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    /// Summary paragraphs for one attribute. Empty on failure.
    async fn summarize(
        &self,
        request: &SummaryRequest<'_>,
        settings: &GeneratorSettings,
    ) -> Vec<String>;
}
