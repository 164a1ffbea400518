//! Search provider implementations.

// Provider variants
pub mod direct;
pub mod html_scrape;
pub mod meta;

// Upstream integrations
mod baidu;
mod duckduckgo;
mod google;

pub use direct::{DirectLibraryProvider, LibrarySearch};
pub use html_scrape::{HtmlScrapeProvider, ScrapeProfile};
pub use meta::{MetaBackend, MetaHit, MetaSearchProvider};

pub use baidu::Baidu;
pub use duckduckgo::DuckDuckGo;
pub use google::Google;
