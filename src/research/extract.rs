use async_trait::async_trait;
use scraper::{Html, Node, Selector};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::{ContentExtractor, ExtractedPage, ResearchError};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Title used when a page has no usable `<title>`.
pub const NO_TITLE: &str = "No title found";

/// Fetches pages over HTTP and extracts their visible text with `scraper`.
///
/// PDFs are not extracted.
#[derive(Debug, Clone)]
pub struct HtmlExtractor {
    http: reqwest::Client,
}

impl HtmlExtractor {
    pub fn new() -> Result<Self, ResearchError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ContentExtractor for HtmlExtractor {
    #[instrument(skip(self))]
    async fn url_to_text(&self, url: &str) -> Option<ExtractedPage> {
        if is_pdf_url(url) {
            info!("Skipping PDF link");
            return None;
        }

        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Error fetching page");
                return None;
            }
        };

        let is_pdf = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/pdf"));
        if is_pdf {
            info!("Skipping PDF response");
            return None;
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => {
                warn!(error = %e, "Error reading page body");
                return None;
            }
        };

        let page = extract_page(&html);
        if page.text.is_empty() {
            debug!("Page had no text");
            return None;
        }
        Some(page)
    }
}

/// `true` for links that point at a PDF by extension.
pub fn is_pdf_url(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.to_ascii_lowercase().ends_with(".pdf")
}

/// Title and newline-joined text nodes of an HTML document.
///
/// Text inside `script`, `style` and `noscript` is ignored.
pub fn extract_page(html: &str) -> ExtractedPage {
    let document = Html::parse_document(html);

    let title = Selector::parse("title")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let root = Selector::parse("body")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .unwrap_or_else(|| document.root_element());

    let mut lines = Vec::new();
    for node in root.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|el| el.name()))
            .is_some_and(|name| matches!(name, "script" | "style" | "noscript"));
        let trimmed = text.trim();
        if !hidden && !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    ExtractedPage {
        title,
        text: lines.join("\n"),
    }
}
