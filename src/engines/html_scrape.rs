//! Paginating HTML scraper.
//!
//! [`HtmlScrapeProvider`] fetches a search results page, extracts entries from
//! the results container and follows the "next page" link until it has
//! collected `limit` results or the engine has no further pages. The markup
//! it understands is described by a [`ScrapeProfile`]; Bing is built in.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::fetcher::PageFetcher;
use crate::fetcher_http::HttpFetcher;
use crate::normalize::{clean_text, truncate_chars, ABSTRACT_MAX_LENGTH};
use crate::{EngineConfig, EngineKind, Provider, Result, ResultRecord, SearchError};

/// Pages fetched per call unless the profile says otherwise.
pub const DEFAULT_MAX_PAGES: usize = 10;

/// Describes where to search and how to read an engine's result pages.
#[derive(Debug, Clone)]
pub struct ScrapeProfile {
    /// URL prefix; the encoded query is appended to it.
    pub search_url: String,
    /// Referer header sent by the session.
    pub referer: Option<String>,
    /// Selector for the results container. No container means no data.
    pub container: String,
    /// Selector for one entry inside the container.
    pub entry: String,
    /// Selector for the entry title. Entries without one are skipped.
    pub title: String,
    /// Selector for the anchor holding the result URL.
    pub link: String,
    /// Selector for the abstract text.
    pub snippet: String,
    /// Selector for the next-page anchor.
    pub next_page: String,
    /// Hard cap on pages fetched per call.
    pub max_pages: usize,
}

impl ScrapeProfile {
    /// Profile for www.bing.com.
    pub fn bing() -> Self {
        Self {
            search_url: "https://www.bing.com/search?q=".to_string(),
            referer: Some("https://www.bing.com/".to_string()),
            container: "ol#b_results".to_string(),
            entry: "li.b_algo".to_string(),
            title: "h2".to_string(),
            link: "h2 a".to_string(),
            snippet: "p".to_string(),
            next_page: r#"a[title="Next page"]"#.to_string(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Overrides the search URL prefix.
    pub fn with_search_url(mut self, search_url: impl Into<String>) -> Self {
        self.search_url = search_url.into();
        self
    }

    /// Overrides the page cap.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }
}

struct Selectors {
    container: Selector,
    entry: Selector,
    title: Selector,
    link: Selector,
    snippet: Selector,
    next_page: Selector,
}

impl Selectors {
    fn compile(profile: &ScrapeProfile) -> Result<Self> {
        let parse = |css: &str| Selector::parse(css).map_err(SearchError::selector);
        Ok(Self {
            container: parse(&profile.container)?,
            entry: parse(&profile.entry)?,
            title: parse(&profile.title)?,
            link: parse(&profile.link)?,
            snippet: parse(&profile.snippet)?,
            next_page: parse(&profile.next_page)?,
        })
    }
}

/// One parsed result page.
struct Page {
    records: Vec<ResultRecord>,
    next: Option<Url>,
}

/// Provider that scrapes paginated HTML result pages.
///
/// Fetch and parse failures never escape [`Provider::perform_search`]: the
/// walk stops and whatever was collected so far is returned.
pub struct HtmlScrapeProvider {
    config: EngineConfig,
    profile: ScrapeProfile,
    selectors: Selectors,
    fetcher: Box<dyn PageFetcher>,
}

impl HtmlScrapeProvider {
    /// Creates a provider over the given profile and fetcher.
    pub fn new(
        config: EngineConfig,
        profile: ScrapeProfile,
        fetcher: Box<dyn PageFetcher>,
    ) -> Result<Self> {
        let selectors = Selectors::compile(&profile)?;
        Ok(Self {
            config,
            profile,
            selectors,
            fetcher,
        })
    }

    /// Bing provider with its own HTTP session.
    pub fn bing(timeout: Duration) -> Result<Self> {
        let profile = ScrapeProfile::bing();
        let fetcher = HttpFetcher::session(profile.referer.as_deref(), timeout)?;
        Self::new(Self::bing_config(timeout), profile, Box::new(fetcher))
    }

    /// Configuration used by [`HtmlScrapeProvider::bing`].
    pub fn bing_config(timeout: Duration) -> EngineConfig {
        EngineConfig {
            name: EngineKind::Bing.label().to_string(),
            shortcut: EngineKind::Bing.as_str().to_string(),
            timeout: timeout.as_secs(),
            enabled: true,
            paging: true,
        }
    }

    fn first_page_url(&self, query: &str) -> Result<Url> {
        let url = format!("{}{}", self.profile.search_url, urlencoding::encode(query));
        Ok(Url::parse(&url)?)
    }

    /// Parses one page. Returns `None` when the results container is absent.
    fn parse_page(&self, html: &str, page_url: &Url, rank_start: usize) -> Option<Page> {
        let document = Html::parse_document(html);
        let container = document.select(&self.selectors.container).next()?;

        let mut records = Vec::new();
        for entry in container.select(&self.selectors.entry) {
            let rank = (rank_start + records.len() + 1) as u32;
            match self.parse_entry(entry, rank) {
                Some(record) => records.push(record),
                None => debug!("{}: skipping malformed entry", self.config.name),
            }
        }

        let next = document
            .select(&self.selectors.next_page)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .and_then(|href| page_url.join(href).ok());

        Some(Page { records, next })
    }

    fn parse_entry(&self, entry: ElementRef<'_>, rank: u32) -> Option<ResultRecord> {
        let title_elem = entry.select(&self.selectors.title).next()?;
        let title = clean_text(&title_elem.text().collect::<String>());
        let title = if title.is_empty() {
            ResultRecord::placeholder_title(&self.config.name, rank)
        } else {
            title
        };

        let url = entry
            .select(&self.selectors.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| href.trim().to_string())
            .unwrap_or_default();

        let description = entry
            .select(&self.selectors.snippet)
            .next()
            .map(|p| clean_text(&p.text().collect::<String>()))
            .map(|text| truncate_chars(&text, ABSTRACT_MAX_LENGTH))
            .unwrap_or_default();

        Some(ResultRecord::new(title, url, description, rank))
    }
}

#[async_trait]
impl Provider for HtmlScrapeProvider {
    fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn perform_search(&self, query: &str, limit: usize) -> Result<Vec<ResultRecord>> {
        if query.trim().is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let mut url = match self.first_page_url(query) {
            Ok(url) => url,
            Err(e) => {
                warn!("{}: cannot build search URL: {}", self.config.name, e);
                return Ok(Vec::new());
            }
        };

        let mut results: Vec<ResultRecord> = Vec::new();
        let mut visited = HashSet::new();

        while results.len() < limit {
            if visited.len() >= self.profile.max_pages {
                debug!("{}: page cap of {} reached", self.config.name, self.profile.max_pages);
                break;
            }
            if !visited.insert(url.clone()) {
                debug!("{}: next page loops back to {}", self.config.name, url);
                break;
            }

            let html = match self.fetcher.fetch(url.as_str()).await {
                Ok(html) => html,
                Err(e) => {
                    warn!("{}: fetching {} failed: {}", self.config.name, url, e);
                    break;
                }
            };

            let Some(page) = self.parse_page(&html, &url, results.len()) else {
                debug!("{}: no results container on {}", self.config.name, url);
                break;
            };

            debug!(
                "{}: page {} yielded {} results",
                self.config.name,
                visited.len(),
                page.records.len()
            );
            results.extend(page.records);

            match page.next {
                Some(next) => url = next,
                None => break,
            }
        }

        results.truncate(limit);
        Ok(results)
    }
}
