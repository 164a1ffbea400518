//! Google result-page scraper.
//!
//! Behaves like a search library: it emits [`RawHit`]s, a bare URL when an
//! entry has no heading and a full record otherwise. Wrap it in a
//! [`DirectLibraryProvider`] to get normalized results.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::warn;

use crate::engines::direct::{DirectLibraryProvider, LibrarySearch};
use crate::fetcher::PageFetcher;
use crate::fetcher_http::HttpFetcher;
use crate::normalize::{clean_text, RawHit};
use crate::{EngineConfig, EngineKind, Result, SearchError};

const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search";

/// Google search library.
pub struct Google {
    search_url: String,
    fetcher: Box<dyn PageFetcher>,
}

impl Google {
    /// Creates a Google library over the given page fetcher.
    pub fn new(fetcher: Box<dyn PageFetcher>) -> Self {
        Self {
            search_url: GOOGLE_SEARCH_URL.to_string(),
            fetcher,
        }
    }

    /// Overrides the search endpoint.
    pub fn with_search_url(mut self, search_url: impl Into<String>) -> Self {
        self.search_url = search_url.into();
        self
    }

    /// Builds the Google provider with its own HTTP session.
    ///
    /// If the session cannot be created the provider is returned in its
    /// unavailable state and will answer every query with no results.
    pub fn provider(timeout: Duration) -> DirectLibraryProvider {
        let config = Self::config(timeout);
        match HttpFetcher::session(Some("https://www.google.com/"), timeout) {
            Ok(fetcher) => DirectLibraryProvider::new(config, Self::new(Box::new(fetcher))),
            Err(e) => {
                warn!("Google session setup failed: {}", e);
                DirectLibraryProvider::unavailable(config)
            }
        }
    }

    /// Configuration used by [`Google::provider`].
    pub fn config(timeout: Duration) -> EngineConfig {
        EngineConfig {
            name: EngineKind::Google.label().to_string(),
            shortcut: EngineKind::Google.as_str().to_string(),
            timeout: timeout.as_secs(),
            enabled: true,
            paging: false,
        }
    }

    fn parse_results(&self, html: &str) -> Result<Vec<RawHit>> {
        let document = Html::parse_document(html);

        let container_selector = Selector::parse("div.g").map_err(SearchError::selector)?;
        let title_selector = Selector::parse("h3").map_err(SearchError::selector)?;
        let link_selector = Selector::parse("a[href]").map_err(SearchError::selector)?;
        let snippet_selector =
            Selector::parse("div[data-sncf], div.VwiC3b").map_err(SearchError::selector)?;

        let mut hits = Vec::new();

        for element in document.select(&container_selector) {
            let url = match element.select(&link_selector).next() {
                Some(el) => match resolve_href(el.value().attr("href").unwrap_or_default()) {
                    Some(url) => url,
                    None => continue,
                },
                None => continue,
            };

            let title = element
                .select(&title_selector)
                .next()
                .map(|el| clean_text(&el.text().collect::<String>()))
                .filter(|t| !t.is_empty());

            let Some(title) = title else {
                hits.push(RawHit::Url(url));
                continue;
            };

            let description = element
                .select(&snippet_selector)
                .next()
                .map(|el| clean_text(&el.text().collect::<String>()));

            hits.push(RawHit::Record {
                title: Some(title),
                url: Some(url),
                description,
            });
        }

        Ok(hits)
    }
}

/// Resolves a result anchor's href, unwrapping `/url?q=` redirects.
///
/// Returns `None` for Google-internal links and empty hrefs.
fn resolve_href(href: &str) -> Option<String> {
    let href = href.trim();
    if let Some(q) = href.strip_prefix("/url?q=") {
        let target = q.split('&').next().unwrap_or(q);
        return urlencoding::decode(target).ok().map(|t| t.into_owned());
    }
    if href.is_empty() || href.starts_with('/') || href.starts_with('#') {
        return None;
    }
    Some(href.to_string())
}

#[async_trait]
impl LibrarySearch for Google {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawHit>> {
        let url = format!(
            "{}?q={}&num={}&hl=en",
            self.search_url,
            urlencoding::encode(query),
            limit
        );

        let html = self.fetcher.fetch(&url).await?;

        if html.contains("/sorry/index") || html.contains("recaptcha") {
            return Err(SearchError::Backend(
                "Google".to_string(),
                "returned a CAPTCHA page (bot detected)".to_string(),
            ));
        }

        let mut hits = self.parse_results(&html)?;
        hits.truncate(limit);
        Ok(hits)
    }
}
