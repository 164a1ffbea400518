//! Baidu result-page scraper.
//!
//! Pages through `www.baidu.com/s` with the `pn` offset parameter and emits
//! dict-like [`RawHit::Fields`] entries (`title`, `url`, `abstract`).

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::engines::direct::{DirectLibraryProvider, LibrarySearch};
use crate::fetcher::PageFetcher;
use crate::fetcher_http::HttpFetcher;
use crate::normalize::{clean_text, truncate_chars, RawHit, ABSTRACT_MAX_LENGTH};
use crate::{EngineConfig, EngineKind, Result, SearchError};

const BAIDU_SEARCH_URL: &str = "https://www.baidu.com/s";

/// Results Baidu serves per page.
const PAGE_SIZE: usize = 10;

/// Baidu search library (百度).
pub struct Baidu {
    search_url: String,
    max_pages: usize,
    fetcher: Box<dyn PageFetcher>,
}

impl Baidu {
    /// Creates a Baidu library over the given page fetcher.
    pub fn new(fetcher: Box<dyn PageFetcher>) -> Self {
        Self {
            search_url: BAIDU_SEARCH_URL.to_string(),
            max_pages: 5,
            fetcher,
        }
    }

    /// Overrides the search endpoint.
    pub fn with_search_url(mut self, search_url: impl Into<String>) -> Self {
        self.search_url = search_url.into();
        self
    }

    /// Overrides the page cap.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Builds the Baidu provider with its own HTTP session.
    ///
    /// If the session cannot be created the provider is returned in its
    /// unavailable state and will answer every query with no results.
    pub fn provider(timeout: Duration) -> DirectLibraryProvider {
        let config = Self::config(timeout);
        match HttpFetcher::session(Some("https://www.baidu.com/"), timeout) {
            Ok(fetcher) => DirectLibraryProvider::new(config, Self::new(Box::new(fetcher))),
            Err(e) => {
                warn!("Baidu session setup failed: {}", e);
                DirectLibraryProvider::unavailable(config)
            }
        }
    }

    /// Configuration used by [`Baidu::provider`].
    pub fn config(timeout: Duration) -> EngineConfig {
        EngineConfig {
            name: EngineKind::Baidu.label().to_string(),
            shortcut: EngineKind::Baidu.as_str().to_string(),
            timeout: timeout.as_secs(),
            enabled: true,
            paging: true,
        }
    }

    fn page_url(&self, query: &str, offset: usize) -> String {
        format!(
            "{}?wd={}&pn={}",
            self.search_url,
            urlencoding::encode(query),
            offset
        )
    }

    fn parse_results(&self, html: &str) -> Result<Vec<RawHit>> {
        let document = Html::parse_document(html);

        let result_selector =
            Selector::parse("div.result, div.c-container").map_err(SearchError::selector)?;
        let title_selector = Selector::parse("h3 a, .t a").map_err(SearchError::selector)?;
        let snippet_selector = Selector::parse(".c-abstract, .c-span-last, .content-right_8Zs40")
            .map_err(SearchError::selector)?;

        let mut hits = Vec::new();

        for element in document.select(&result_selector) {
            let title_elem = match element.select(&title_selector).next() {
                Some(el) => el,
                None => continue,
            };

            let mut fields = Map::new();
            let title = clean_text(&title_elem.text().collect::<String>());
            if !title.is_empty() {
                fields.insert("title".to_string(), Value::String(title));
            }
            if let Some(href) = title_elem.value().attr("href").map(str::trim) {
                if !href.is_empty() {
                    fields.insert("url".to_string(), Value::String(href.to_string()));
                }
            }
            if let Some(snippet) = element.select(&snippet_selector).next() {
                let text = clean_text(&snippet.text().collect::<String>());
                fields.insert(
                    "abstract".to_string(),
                    Value::String(truncate_chars(&text, ABSTRACT_MAX_LENGTH)),
                );
            }

            hits.push(RawHit::Fields(fields));
        }

        Ok(hits)
    }
}

#[async_trait]
impl LibrarySearch for Baidu {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawHit>> {
        let mut hits = Vec::new();

        for page in 0..self.max_pages {
            if hits.len() >= limit {
                break;
            }

            let url = self.page_url(query, page * PAGE_SIZE);
            let html = match self.fetcher.fetch(&url).await {
                Ok(html) => html,
                Err(e) if page == 0 => return Err(e),
                Err(e) => {
                    warn!("Baidu page {} failed: {}", page + 1, e);
                    break;
                }
            };

            let page_hits = self.parse_results(&html)?;
            debug!("Baidu page {} yielded {} entries", page + 1, page_hits.len());
            if page_hits.is_empty() {
                break;
            }
            hits.extend(page_hits);
        }

        hits.truncate(limit);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::fake::MapFetcher;
    use crate::Provider;

    fn page(n: usize, prefix: &str) -> String {
        let items: String = (1..=n)
            .map(|i| {
                format!(
                    r#"<div class="result c-container"><h3 class="t"><a href="http://www.baidu.com/link?url={p}{i}">{p} {i}</a></h3><div class="c-abstract">摘要 {i}</div></div>"#,
                    p = prefix,
                    i = i
                )
            })
            .collect();
        format!(r#"<html><body><div id="content_left">{}</div></body></html>"#, items)
    }

    fn make_baidu() -> Baidu {
        Baidu::new(Box::new(MapFetcher::new()))
    }

    #[test]
    fn test_baidu_config() {
        let config = Baidu::config(Duration::from_secs(10));
        assert_eq!(config.name, "Baidu");
        assert_eq!(config.shortcut, "baidu");
        assert_eq!(config.timeout, 10);
        assert!(config.paging);
    }

    #[test]
    fn test_page_url() {
        let baidu = make_baidu();
        assert_eq!(
            baidu.page_url("人工智能", 10),
            "https://www.baidu.com/s?wd=%E4%BA%BA%E5%B7%A5%E6%99%BA%E8%83%BD&pn=10"
        );
    }

    #[test]
    fn test_parse_results_empty_html() {
        let hits = make_baidu().parse_results("<html><body></body></html>").unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_parse_results_with_results() {
        let html = r#"
            <html>
            <body>
                <div class="c-container">
                    <h3><a href="https://www.rust-lang.org/">Rust 编程语言</a></h3>
                    <div class="c-abstract">一门赋予每个人构建可靠软件能力的语言。</div>
                </div>
                <div class="result">
                    <h3><a href="https://doc.rust-lang.org/book/">Rust 程序设计语言</a></h3>
                </div>
            </body>
            </html>
        "#;
        let hits = make_baidu().parse_results(html).unwrap();
        assert_eq!(hits.len(), 2);

        let first = hits[0].clone().into_record("Baidu", 1);
        assert_eq!(first.title, "Rust 编程语言");
        assert_eq!(first.url, "https://www.rust-lang.org/");
        assert_eq!(first.description, "一门赋予每个人构建可靠软件能力的语言。");

        let second = hits[1].clone().into_record("Baidu", 2);
        assert_eq!(second.title, "Rust 程序设计语言");
        assert_eq!(second.description, "");
    }

    #[test]
    fn test_parse_results_skips_missing_title() {
        let html = r#"
            <html><body>
                <div class="c-container"><div class="c-abstract">No title here</div></div>
            </body></html>
        "#;
        let hits = make_baidu().parse_results(html).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_parse_results_keeps_entry_without_url() {
        let html = r#"<div class="c-container"><h3><a>Only a title</a></h3></div>"#;
        let hits = make_baidu().parse_results(html).unwrap();
        let record = hits[0].clone().into_record("Baidu", 1);
        assert_eq!(record.title, "Only a title");
        assert_eq!(record.url, "");
    }

    #[tokio::test]
    async fn test_search_pages_until_limit() {
        let fetcher = MapFetcher::new()
            .page("https://www.baidu.com/s?wd=rust&pn=0", page(10, "a"))
            .page("https://www.baidu.com/s?wd=rust&pn=10", page(10, "b"));
        let baidu = Baidu::new(Box::new(fetcher));

        let hits = baidu.search("rust", 15).await.unwrap();
        assert_eq!(hits.len(), 15);
    }

    #[tokio::test]
    async fn test_search_stops_on_empty_page() {
        let fetcher = MapFetcher::new()
            .page("https://www.baidu.com/s?wd=rust&pn=0", page(4, "a"))
            .page("https://www.baidu.com/s?wd=rust&pn=10", page(0, "b"));
        let baidu = Baidu::new(Box::new(fetcher));

        let hits = baidu.search("rust", 20).await.unwrap();
        assert_eq!(hits.len(), 4);
    }

    #[tokio::test]
    async fn test_search_later_page_failure_keeps_hits() {
        let fetcher = MapFetcher::new().page("https://www.baidu.com/s?wd=rust&pn=0", page(10, "a"));
        let baidu = Baidu::new(Box::new(fetcher));

        let hits = baidu.search("rust", 20).await.unwrap();
        assert_eq!(hits.len(), 10);
    }

    #[tokio::test]
    async fn test_search_first_page_failure_is_error() {
        let baidu = make_baidu();
        assert!(baidu.search("rust", 10).await.is_err());
    }

    #[tokio::test]
    async fn test_provider_ranks_and_swallows_failure() {
        let fetcher = MapFetcher::new().page("https://www.baidu.com/s?wd=rust&pn=0", page(3, "a"));
        let provider = DirectLibraryProvider::new(
            Baidu::config(Duration::from_secs(5)),
            Baidu::new(Box::new(fetcher)),
        );
        let results = provider.perform_search("rust", 10).await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[2].rank, 3);
        assert_eq!(results[2].title, "a 3");

        let provider =
            DirectLibraryProvider::new(Baidu::config(Duration::from_secs(5)), make_baidu());
        assert!(provider.perform_search("rust", 10).await.unwrap().is_empty());
    }
}
