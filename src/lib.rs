//! # serp-gateway
//!
//! Search results from a privacy-focused meta-search backend or from scraped
//! Google, Bing and Baidu result pages, normalized into one record shape and
//! served as JSON.
//!
//! - [`Provider`] is the single capability every upstream implements
//! - [`engines::HtmlScrapeProvider`] follows "next page" links until enough
//!   results are collected
//! - [`engines::DirectLibraryProvider`] normalizes loosely-shaped entries and
//!   turns failures into empty results
//! - [`engines::MetaSearchProvider`] maps structured backend records and
//!   reports failures as typed errors
//! - [`Aggregator`] fans a query out to the scraped engines
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use serp_gateway::{engines::HtmlScrapeProvider, Provider};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bing = HtmlScrapeProvider::bing(Duration::from_secs(10))?;
//!     for result in bing.perform_search("rust programming", 5).await? {
//!         println!("{}. {}: {}", result.rank, result.title, result.url);
//!     }
//!     Ok(())
//! }
//! ```

mod aggregator;
mod engine;
mod error;
mod query;
mod result;

pub mod config;
pub mod engines;
pub mod fetcher;
pub mod fetcher_http;
pub mod normalize;
pub mod server;

pub use aggregator::Aggregator;
pub use engine::{EngineConfig, Provider};
pub use error::{Result, SearchError};
pub use query::{clamp_limit, EngineKind, EngineSelector, Query, DEFAULT_LIMIT, MAX_LIMIT};
pub use result::{AggregateResponse, EngineResults, ResultRecord};
