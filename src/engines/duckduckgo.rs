//! DuckDuckGo meta-search backend.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::engines::meta::{MetaBackend, MetaHit, MetaSearchProvider};
use crate::fetcher::PageFetcher;
use crate::fetcher_http::HttpFetcher;
use crate::normalize::clean_text;
use crate::{EngineConfig, Result, SearchError};

const DDG_HTML_URL: &str = "https://html.duckduckgo.com/html/";

/// DuckDuckGo HTML endpoint, used as the privacy-focused meta-search backend.
pub struct DuckDuckGo {
    search_url: String,
    fetcher: Box<dyn PageFetcher>,
}

impl DuckDuckGo {
    /// Creates a backend over the given page fetcher.
    pub fn new(fetcher: Box<dyn PageFetcher>) -> Self {
        Self {
            search_url: DDG_HTML_URL.to_string(),
            fetcher,
        }
    }

    /// Overrides the search endpoint.
    pub fn with_search_url(mut self, search_url: impl Into<String>) -> Self {
        self.search_url = search_url.into();
        self
    }

    /// Builds the meta-search provider with its own HTTP session.
    pub fn provider(timeout: Duration) -> Result<MetaSearchProvider> {
        let fetcher = HttpFetcher::session(Some("https://html.duckduckgo.com/"), timeout)?;
        Ok(MetaSearchProvider::new(
            Self::config(timeout),
            Self::new(Box::new(fetcher)),
        ))
    }

    /// Configuration used by [`DuckDuckGo::provider`].
    pub fn config(timeout: Duration) -> EngineConfig {
        EngineConfig {
            name: "DuckDuckGo".to_string(),
            shortcut: "ddg".to_string(),
            timeout: timeout.as_secs(),
            enabled: true,
            paging: false,
        }
    }

    fn parse_results(&self, html: &str) -> Result<Vec<MetaHit>> {
        let document = Html::parse_document(html);
        let result_selector = Selector::parse(".result").map_err(SearchError::selector)?;
        let title_selector =
            Selector::parse("a.result__a, .result__title a").map_err(SearchError::selector)?;
        let snippet_selector = Selector::parse(".result__snippet").map_err(SearchError::selector)?;

        let mut hits = Vec::new();

        for element in document.select(&result_selector) {
            let Some(title_elem) = element.select(&title_selector).next() else {
                continue;
            };

            let title = clean_text(&title_elem.text().collect::<String>());
            let href = title_elem.value().attr("href").unwrap_or_default();
            let href = if href.starts_with("//duckduckgo.com/l/") {
                extract_redirect_url(href).unwrap_or_else(|| href.to_string())
            } else {
                href.to_string()
            };

            let body = element
                .select(&snippet_selector)
                .next()
                .map(|e| clean_text(&e.text().collect::<String>()))
                .unwrap_or_default();

            if !href.is_empty() && !title.is_empty() {
                hits.push(MetaHit::new(title, href, body));
            }
        }

        Ok(hits)
    }
}

#[async_trait]
impl MetaBackend for DuckDuckGo {
    fn name(&self) -> &str {
        "DuckDuckGo"
    }

    async fn text(&self, query: &str, max_results: usize) -> Result<Vec<MetaHit>> {
        let url = format!("{}?q={}", self.search_url, urlencoding::encode(query));
        let html = self.fetcher.fetch(&url).await?;

        if html.contains("anomaly-modal") {
            return Err(SearchError::Backend(
                self.name().to_string(),
                "request was flagged as automated".to_string(),
            ));
        }

        let mut hits = self.parse_results(&html)?;
        hits.truncate(max_results);
        Ok(hits)
    }
}

fn extract_redirect_url(url: &str) -> Option<String> {
    let url = url.trim_start_matches("//duckduckgo.com/l/?uddg=");
    let decoded = urlencoding::decode(url).ok()?;
    let end = decoded.find('&').unwrap_or(decoded.len());
    Some(decoded[..end].to_string())
}
