//! Server configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Result, SearchError};

/// Settings for the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Per-request upstream timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            timeout_secs: 10,
        }
    }
}

impl ServerConfig {
    /// Rejects settings the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(SearchError::Other("host must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(SearchError::Other("timeout must be at least one second".to_string()));
        }
        Ok(())
    }

    /// `host:port` string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Upstream request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
