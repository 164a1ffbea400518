//! Provider over a library-style search capability.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::normalize::{normalize_hits, RawHit};
use crate::{EngineConfig, Provider, Result, ResultRecord};

/// An external search capability that returns loosely-shaped entries.
///
/// Entries may be bare URLs, dict-like maps, or attribute records; see
/// [`RawHit`].
#[async_trait]
pub trait LibrarySearch: Send + Sync {
    /// Runs the search, returning up to roughly `limit` entries.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawHit>>;
}

/// Provider that delegates to a [`LibrarySearch`] and normalizes its output.
///
/// Failures are logged and reported as an empty result, so callers cannot
/// tell "nothing found" from "library errored". A provider built with
/// [`DirectLibraryProvider::unavailable`] behaves the same way.
pub struct DirectLibraryProvider {
    config: EngineConfig,
    library: Option<Box<dyn LibrarySearch>>,
}

impl DirectLibraryProvider {
    /// Creates a provider over the given library.
    pub fn new(config: EngineConfig, library: impl LibrarySearch + 'static) -> Self {
        Self {
            config,
            library: Some(Box::new(library)),
        }
    }

    /// Creates a provider whose library could not be set up.
    pub fn unavailable(config: EngineConfig) -> Self {
        Self {
            config,
            library: None,
        }
    }

    /// Returns whether a library is attached.
    pub fn is_available(&self) -> bool {
        self.library.is_some()
    }
}

#[async_trait]
impl Provider for DirectLibraryProvider {
    fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn perform_search(&self, query: &str, limit: usize) -> Result<Vec<ResultRecord>> {
        let Some(library) = &self.library else {
            warn!("{} search library is not available", self.config.name);
            return Ok(Vec::new());
        };

        match library.search(query, limit).await {
            Ok(hits) => {
                debug!("{} library returned {} entries", self.config.name, hits.len());
                let mut records = normalize_hits(&self.config.name, hits);
                records.truncate(limit);
                Ok(records)
            }
            Err(e) => {
                warn!("{} search error: {}", self.config.name, e);
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SearchError;
    use serde_json::json;

    struct Canned(Vec<RawHit>);

    #[async_trait]
    impl LibrarySearch for Canned {
        async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<RawHit>> {
            Ok(self.0.clone())
        }
    }

    struct Broken;

    #[async_trait]
    impl LibrarySearch for Broken {
        async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<RawHit>> {
            Err(SearchError::Other("library blew up".to_string()))
        }
    }

    fn config(name: &str) -> EngineConfig {
        EngineConfig {
            name: name.to_string(),
            shortcut: name.to_lowercase(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_url_strings_get_placeholders() {
        let provider = DirectLibraryProvider::new(
            config("Google"),
            Canned(vec![
                RawHit::Url("https://a.example".to_string()),
                RawHit::Url("https://b.example".to_string()),
            ]),
        );

        let results = provider.perform_search("rust", 10).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Google Result 1");
        assert_eq!(results[0].description, "");
        assert_eq!(results[1].title, "Google Result 2");
        assert_eq!(results[1].url, "https://b.example");
    }

    #[tokio::test]
    async fn test_mixed_shapes() {
        let map = match json!({"title": "Dict", "url": "https://d.example", "abstract": "A"}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        let provider = DirectLibraryProvider::new(
            config("Baidu"),
            Canned(vec![
                RawHit::Fields(map),
                RawHit::record("Rec", "https://r.example", "R"),
                RawHit::Url("https://u.example".to_string()),
            ]),
        );

        let results = provider.perform_search("rust", 10).await.unwrap();

        assert_eq!(results[0].title, "Dict");
        assert_eq!(results[0].description, "A");
        assert_eq!(results[1].title, "Rec");
        assert_eq!(results[2].title, "Baidu Result 3");
        assert_eq!(results[2].rank, 3);
    }

    #[tokio::test]
    async fn test_truncates_to_limit() {
        let hits = (0..8)
            .map(|i| RawHit::Url(format!("https://{}.example", i)))
            .collect();
        let provider = DirectLibraryProvider::new(config("Google"), Canned(hits));

        let results = provider.perform_search("rust", 3).await.unwrap();
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_failure_is_empty() {
        let provider = DirectLibraryProvider::new(config("Google"), Broken);
        let results = tokio_test::assert_ok!(provider.perform_search("rust", 5).await);
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_is_empty() {
        let provider = DirectLibraryProvider::unavailable(config("Baidu"));
        assert!(!provider.is_available());
        let results = provider.perform_search("rust", 5).await.unwrap();
        assert!(results.is_empty());
    }
}
