//! Page fetcher abstraction for retrieving HTML content.

use async_trait::async_trait;

use crate::Result;

/// Trait for fetching the raw HTML document behind a URL.
///
/// All configuration (headers, user-agent, timeouts) is set at construction
/// time; `fetch` is a simple URL-in, HTML-out interface. Non-success HTTP
/// statuses are reported as errors.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the HTML content of the given URL.
    async fn fetch(&self, url: &str) -> Result<String>;
}
