//! Search result types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single normalized search result.
///
/// `rank` is the 1-based position within the producing provider's output.
/// Ranks are not unique across providers once results are aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Result title.
    pub title: String,
    /// Result URL (empty when the upstream entry had none).
    pub url: String,
    /// Result description/snippet (empty when absent).
    pub description: String,
    /// 1-based position within the provider's results.
    pub rank: u32,
}

impl ResultRecord {
    /// Creates a new result record.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
        rank: u32,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            description: description.into(),
            rank,
        }
    }

    /// Placeholder title used when an upstream entry carries none.
    pub fn placeholder_title(engine: &str, rank: u32) -> String {
        format!("{} Result {}", engine, rank)
    }
}

/// Results contributed by one engine to an aggregated response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineResults {
    /// Number of results.
    pub count: usize,
    /// The results, in provider order.
    pub results: Vec<ResultRecord>,
}

impl EngineResults {
    /// Wraps a provider's output.
    pub fn new(results: Vec<ResultRecord>) -> Self {
        Self {
            count: results.len(),
            results,
        }
    }
}

/// Composite payload produced by the aggregator.
///
/// Serializes with one top-level key per engine, next to `query` and
/// `engines_used`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResponse {
    /// The query text.
    pub query: String,
    /// Engines that were invoked, in invocation order.
    pub engines_used: Vec<String>,
    /// Per-engine breakdown keyed by engine name.
    #[serde(flatten)]
    pub engines: BTreeMap<String, EngineResults>,
}

impl AggregateResponse {
    /// Creates an empty payload for the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Records one engine's contribution.
    pub fn add_engine(&mut self, engine: impl Into<String>, results: Vec<ResultRecord>) {
        let engine = engine.into();
        self.engines_used.push(engine.clone());
        self.engines.insert(engine, EngineResults::new(results));
    }

    /// Returns the breakdown for an engine.
    pub fn engine(&self, engine: &str) -> Option<&EngineResults> {
        self.engines.get(engine)
    }

    /// Total results across all engines.
    pub fn total_count(&self) -> usize {
        self.engines.values().map(|e| e.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_record_new() {
        let record = ResultRecord::new("Title", "https://example.com", "Snippet", 1);
        assert_eq!(record.title, "Title");
        assert_eq!(record.url, "https://example.com");
        assert_eq!(record.description, "Snippet");
        assert_eq!(record.rank, 1);
    }

    #[test]
    fn test_placeholder_title() {
        assert_eq!(ResultRecord::placeholder_title("Google", 3), "Google Result 3");
    }

    #[test]
    fn test_result_record_serialization() {
        let record = ResultRecord::new("Title", "https://example.com", "", 2);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"url\":\"https://example.com\""));
        assert!(json.contains("\"description\":\"\""));
        assert!(json.contains("\"rank\":2"));
    }

    #[test]
    fn test_engine_results_count() {
        let results = EngineResults::new(vec![
            ResultRecord::new("a", "u1", "", 1),
            ResultRecord::new("b", "u2", "", 2),
        ]);
        assert_eq!(results.count, 2);
    }

    #[test]
    fn test_aggregate_response_add_engine() {
        let mut response = AggregateResponse::new("rust");
        response.add_engine("bing", vec![ResultRecord::new("a", "u", "", 1)]);
        response.add_engine("google", vec![]);

        assert_eq!(response.engines_used, vec!["bing", "google"]);
        assert_eq!(response.engine("bing").unwrap().count, 1);
        assert_eq!(response.engine("google").unwrap().count, 0);
        assert!(response.engine("baidu").is_none());
        assert_eq!(response.total_count(), 1);
    }

    #[test]
    fn test_aggregate_response_flattens_engines() {
        let mut response = AggregateResponse::new("rust");
        response.add_engine("bing", vec![ResultRecord::new("a", "u", "d", 1)]);

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["query"], "rust");
        assert_eq!(value["engines_used"][0], "bing");
        assert_eq!(value["bing"]["count"], 1);
        assert_eq!(value["bing"]["results"][0]["title"], "a");
    }
}
