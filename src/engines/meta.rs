//! Provider over a meta-search backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{EngineConfig, Provider, Result, ResultRecord, SearchError};

/// A structured record as returned by a meta-search backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaHit {
    pub title: String,
    pub href: String,
    pub body: String,
}

impl MetaHit {
    pub fn new(title: impl Into<String>, href: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
            body: body.into(),
        }
    }
}

/// A backend that performs text search and honours `max_results` itself.
#[async_trait]
pub trait MetaBackend: Send + Sync {
    /// Backend name, used in error messages.
    fn name(&self) -> &str;

    /// Runs a text search returning at most `max_results` hits.
    async fn text(&self, query: &str, max_results: usize) -> Result<Vec<MetaHit>>;
}

/// Provider that maps a [`MetaBackend`]'s hits straight onto records.
///
/// Unlike the scraping providers, backend failures are returned as
/// [`SearchError::Backend`] so a caller can tell "failed" from "empty".
pub struct MetaSearchProvider {
    config: EngineConfig,
    backend: Box<dyn MetaBackend>,
}

impl MetaSearchProvider {
    /// Creates a provider over the given backend.
    pub fn new(config: EngineConfig, backend: impl MetaBackend + 'static) -> Self {
        Self {
            config,
            backend: Box::new(backend),
        }
    }
}

#[async_trait]
impl Provider for MetaSearchProvider {
    fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn perform_search(&self, query: &str, limit: usize) -> Result<Vec<ResultRecord>> {
        let hits = self.backend.text(query, limit).await.map_err(|e| match e {
            SearchError::Backend(..) => e,
            other => SearchError::Backend(self.backend.name().to_string(), other.to_string()),
        })?;

        debug!("{} backend returned {} hits", self.backend.name(), hits.len());

        Ok(hits
            .into_iter()
            .enumerate()
            .map(|(i, hit)| ResultRecord::new(hit.title, hit.href, hit.body, (i + 1) as u32))
            .collect())
    }
}
