//! Search query representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Result, SearchError};

/// Upper bound on the number of results a query may request.
pub const MAX_LIMIT: usize = 50;

/// Limit used when the requested limit is zero or negative.
pub const DEFAULT_LIMIT: usize = 20;

/// Clamps a requested limit into `1..=MAX_LIMIT`.
///
/// Non-positive requests fall back to [`DEFAULT_LIMIT`].
pub fn clamp_limit(requested: i64) -> usize {
    if requested <= 0 {
        DEFAULT_LIMIT
    } else {
        (requested as u64).min(MAX_LIMIT as u64) as usize
    }
}

/// A scraped search engine that can be selected by name.
///
/// Variants are declared alphabetically; the derived ordering is the fixed
/// invocation order used when several engines are queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Baidu,
    Bing,
    Google,
}

impl EngineKind {
    /// All engines, in invocation order.
    pub const ALL: [EngineKind; 3] = [EngineKind::Baidu, EngineKind::Bing, EngineKind::Google];

    /// Lowercase identifier used in URLs and payload keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Baidu => "baidu",
            EngineKind::Bing => "bing",
            EngineKind::Google => "google",
        }
    }

    /// Display name, used as the provider name in placeholder titles.
    pub fn label(&self) -> &'static str {
        match self {
            EngineKind::Baidu => "Baidu",
            EngineKind::Bing => "Bing",
            EngineKind::Google => "Google",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineKind {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "baidu" => Ok(EngineKind::Baidu),
            "bing" => Ok(EngineKind::Bing),
            "google" => Ok(EngineKind::Google),
            other => Err(SearchError::InvalidQuery(format!("unknown engine '{}'", other))),
        }
    }
}

/// Which engines a query should be sent to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EngineSelector {
    /// Every configured engine.
    #[default]
    All,
    /// A single engine.
    Only(EngineKind),
}

impl EngineSelector {
    /// Returns whether the selector includes the given engine.
    pub fn includes(&self, kind: EngineKind) -> bool {
        match self {
            EngineSelector::All => true,
            EngineSelector::Only(only) => *only == kind,
        }
    }
}

impl FromStr for EngineSelector {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(EngineSelector::All)
        } else {
            s.parse().map(EngineSelector::Only)
        }
    }
}

/// A validated search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// The search terms.
    pub text: String,
    /// Maximum number of results, already clamped.
    pub limit: usize,
    /// Engines to query.
    pub engines: EngineSelector,
}

impl Query {
    /// Creates a query, clamping `limit` and rejecting blank text.
    pub fn new(text: impl Into<String>, limit: i64) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SearchError::InvalidQuery("Query cannot be empty".into()));
        }
        Ok(Self {
            text,
            limit: clamp_limit(limit),
            engines: EngineSelector::All,
        })
    }

    /// Sets the engines to query.
    pub fn with_engines(mut self, engines: EngineSelector) -> Self {
        self.engines = engines;
        self
    }
}
