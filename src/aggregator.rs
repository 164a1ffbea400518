//! Fan-out over the configured scraping providers.

use std::collections::BTreeMap;
use std::time::Instant;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::{
    AggregateResponse, EngineKind, EngineSelector, Provider, Query, Result, ResultRecord,
    SearchError,
};

/// Sends a query to one or more registered providers and merges the output.
///
/// Providers run concurrently but are reported in [`EngineKind`] order, so
/// the payload is the same regardless of which upstream answers first. A
/// provider that fails contributes an empty result set; it never prevents
/// the others from being reported.
#[derive(Default)]
pub struct Aggregator {
    providers: BTreeMap<EngineKind, Box<dyn Provider>>,
}

impl Aggregator {
    /// Creates an aggregator with no providers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the provider for an engine, replacing any previous one.
    pub fn register<P: Provider + 'static>(&mut self, kind: EngineKind, provider: P) {
        self.providers.insert(kind, Box::new(provider));
    }

    /// Returns the number of registered providers.
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Returns the registered engines, in invocation order.
    pub fn engines(&self) -> Vec<EngineKind> {
        self.providers.keys().copied().collect()
    }

    /// Queries every selected, enabled provider.
    pub async fn search(&self, query: &Query) -> AggregateResponse {
        let start = Instant::now();

        let selected: Vec<_> = self
            .providers
            .iter()
            .filter(|(kind, provider)| query.engines.includes(**kind) && provider.is_enabled())
            .collect();
        debug!("Searching {} engines for '{}'", selected.len(), query.text);

        let futures = selected.iter().map(|(kind, provider)| async move {
            let outcome = provider.perform_search(&query.text, query.limit).await;
            (**kind, outcome)
        });

        let mut response = AggregateResponse::new(query.text.clone());
        for (kind, outcome) in join_all(futures).await {
            let results = match outcome {
                Ok(mut results) => {
                    results.truncate(query.limit);
                    debug!("Engine {} returned {} results", kind, results.len());
                    results
                }
                Err(e) => {
                    warn!("Engine {} failed: {}", kind, e);
                    Vec::new()
                }
            };
            response.add_engine(kind.as_str(), results);
        }

        info!(
            "Aggregated {} results from {:?} in {}ms",
            response.total_count(),
            response.engines_used,
            start.elapsed().as_millis()
        );
        response
    }

    /// Queries a single engine.
    pub async fn search_engine(
        &self,
        kind: EngineKind,
        query: &Query,
    ) -> Result<Vec<ResultRecord>> {
        let provider = self
            .providers
            .get(&kind)
            .ok_or_else(|| SearchError::Other(format!("engine '{}' is not configured", kind)))?;

        let mut results = provider.perform_search(&query.text, query.limit).await?;
        results.truncate(query.limit);
        Ok(results)
    }

    /// Convenience for [`Aggregator::search`] over a selector.
    pub async fn search_with(
        &self,
        text: &str,
        limit: i64,
        engines: EngineSelector,
    ) -> Result<AggregateResponse> {
        let query = Query::new(text, limit)?.with_engines(engines);
        Ok(self.search(&query).await)
    }
}
