use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use super::{
    ContentExtractor, ExtractedPage, ResearchError, SearchBackend, SearchSettings,
    SummaryGenerator, SummaryRequest,
};
use crate::evaluation::GeneratorSettings;

/// Search backend with canned URL lists per attribute.
#[derive(Default)]
pub struct MockSearch {
    results: HashMap<String, Vec<String>>,
    failing: bool,
    calls: Mutex<Vec<(String, SearchSettings)>>,
}

impl MockSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, attribute: &str, urls: &[&str]) -> Self {
        self.results.insert(
            attribute.to_string(),
            urls.iter().map(|u| u.to_string()).collect(),
        );
        self
    }

    /// Every search returns [`ResearchError::NotConfigured`].
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Attributes searched so far, with their settings.
    pub fn calls(&self) -> Vec<(String, SearchSettings)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl SearchBackend for MockSearch {
    async fn search(
        &self,
        _query: &str,
        attribute: &str,
        settings: &SearchSettings,
    ) -> Result<Vec<String>, ResearchError> {
        self.calls.lock().push((attribute.to_string(), *settings));
        if self.failing {
            return Err(ResearchError::NotConfigured {
                backend: "mock",
                missing: "credentials",
            });
        }
        Ok(self.results.get(attribute).cloned().unwrap_or_default())
    }
}

/// Extractor that serves pages from memory. Unknown URLs yield nothing.
#[derive(Default)]
pub struct MockExtractor {
    pages: HashMap<String, ExtractedPage>,
    calls: Mutex<Vec<String>>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, title: &str, text: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            ExtractedPage {
                title: title.to_string(),
                text: text.to_string(),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ContentExtractor for MockExtractor {
    async fn url_to_text(&self, url: &str) -> Option<ExtractedPage> {
        self.calls.lock().push(url.to_string());
        self.pages.get(url).cloned()
    }
}

/// Generator returning fixed paragraphs for every attribute, or per attribute when set.
#[derive(Default)]
pub struct MockSummaryGenerator {
    default: Vec<String>,
    per_attribute: HashMap<String, Vec<String>>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl MockSummaryGenerator {
    pub fn with_paragraphs(paragraphs: &[&str]) -> Self {
        Self {
            default: paragraphs.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, attribute: &str, paragraphs: &[&str]) -> Self {
        self.per_attribute.insert(
            attribute.to_string(),
            paragraphs.iter().map(|p| p.to_string()).collect(),
        );
        self
    }

    /// `(attribute, article_links)` per call.
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl SummaryGenerator for MockSummaryGenerator {
    async fn summarize(
        &self,
        request: &SummaryRequest<'_>,
        _settings: &GeneratorSettings,
    ) -> Vec<String> {
        self.calls.lock().push((
            request.attribute.to_string(),
            request.article_links.to_vec(),
        ));
        self.per_attribute
            .get(request.attribute)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }
}
