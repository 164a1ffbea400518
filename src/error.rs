//! Error types for the search library.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Search timeout exceeded.
    #[error("Search timeout exceeded")]
    Timeout,

    /// Invalid query.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The upstream backend refused or failed the search.
    #[error("Backend '{0}' failed: {1}")]
    Backend(String, String),

    /// URL parsing error.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

impl SearchError {
    pub(crate) fn selector(err: impl std::fmt::Debug) -> Self {
        SearchError::Parse(format!("Failed to parse selector: {:?}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_parse() {
        let err = SearchError::Parse("invalid markup".to_string());
        assert_eq!(err.to_string(), "Failed to parse response: invalid markup");
    }

    #[test]
    fn test_error_display_backend() {
        let err = SearchError::Backend("DuckDuckGo".to_string(), "rate limited".to_string());
        assert_eq!(err.to_string(), "Backend 'DuckDuckGo' failed: rate limited");
    }

    #[test]
    fn test_error_display_timeout() {
        assert_eq!(SearchError::Timeout.to_string(), "Search timeout exceeded");
    }

    #[test]
    fn test_error_display_invalid_query() {
        let err = SearchError::InvalidQuery("empty query".to_string());
        assert_eq!(err.to_string(), "Invalid query: empty query");
    }

    #[test]
    fn test_error_from_url_parse() {
        let err: SearchError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, SearchError::UrlParse(_)));
    }

    #[test]
    fn test_selector_error_is_parse() {
        let err = SearchError::selector("bad");
        assert!(err.to_string().contains("Failed to parse selector"));
    }
}
