//! Search provider trait and configuration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Result, ResultRecord};

/// Configuration for a search provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Display name of the engine, used in placeholder titles.
    pub name: String,
    /// Short identifier (e.g., "bing").
    pub shortcut: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Whether the provider is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Whether the provider follows result pages.
    #[serde(default)]
    pub paging: bool,
}

fn default_timeout() -> u64 {
    10
}

fn default_enabled() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            shortcut: String::new(),
            timeout: 10,
            enabled: true,
            paging: false,
        }
    }
}

/// A source of normalized search results.
///
/// Implementations turn a query into at most `limit` records, ranked from 1
/// in the order the upstream returned them. Whether an upstream failure is
/// reported as an error or as an empty result is a per-provider policy.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Returns the provider configuration.
    fn config(&self) -> &EngineConfig;

    /// Performs a search and returns up to `limit` results.
    async fn perform_search(&self, query: &str, limit: usize) -> Result<Vec<ResultRecord>>;

    /// Returns the engine name.
    fn name(&self) -> &str {
        &self.config().name
    }

    /// Returns the engine shortcut.
    fn shortcut(&self) -> &str {
        &self.config().shortcut
    }

    /// Returns whether the provider is enabled.
    fn is_enabled(&self) -> bool {
        self.config().enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        config: EngineConfig,
    }

    #[async_trait]
    impl Provider for Fixed {
        fn config(&self) -> &EngineConfig {
            &self.config
        }

        async fn perform_search(&self, _query: &str, limit: usize) -> Result<Vec<ResultRecord>> {
            Ok((1..=limit as u32)
                .map(|rank| ResultRecord::new("t", "u", "", rank))
                .collect())
        }
    }

    #[test]
    fn test_engine_config_default() {
        let config = EngineConfig::default();
        assert_eq!(config.name, "");
        assert_eq!(config.shortcut, "");
        assert_eq!(config.timeout, 10);
        assert!(config.enabled);
        assert!(!config.paging);
    }

    #[test]
    fn test_engine_config_deserialization_defaults() {
        let json = r#"{"name":"Bing","shortcut":"bing"}"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.name, "Bing");
        assert_eq!(config.timeout, 10);
        assert!(config.enabled);
        assert!(!config.paging);
    }

    #[test]
    fn test_engine_config_serialization() {
        let config = EngineConfig {
            name: "Test".to_string(),
            shortcut: "t".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"name\":\"Test\""));
        assert!(json.contains("\"shortcut\":\"t\""));
    }

    #[tokio::test]
    async fn test_provider_default_methods() {
        let provider = Fixed {
            config: EngineConfig {
                name: "Fixed".to_string(),
                shortcut: "fx".to_string(),
                enabled: false,
                ..Default::default()
            },
        };
        assert_eq!(provider.name(), "Fixed");
        assert_eq!(provider.shortcut(), "fx");
        assert!(!provider.is_enabled());
        assert_eq!(provider.perform_search("q", 3).await.unwrap().len(), 3);
    }
}
