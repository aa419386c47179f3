//! Metadata sources that resolve a DOI into [`CitationMetadata`].
//!
//! Every source implements the [`MetadataSource`] trait. The
//! [`MetadataResolver`] tries the configured sources in order and caches
//! what they return.
//!
//! # Feature Flags
//!
//! - `crossref` - Enable the CrossRef REST API source (default: enabled)
//! - `datacite` - Enable the DataCite REST API source (default: enabled)
//!
//! # Source Order
//!
//! The `[sources]` table of the configuration file lists source ids in the
//! order they are tried:
//!
//! ```toml
//! [sources]
//! order = ["datacite", "crossref"]
//! ```
//!
//! The same list can be set through the environment:
//!
//! ```bash
//! export DOI_CITE_SOURCES__ORDER=crossref
//! ```

#[cfg(feature = "source-crossref")]
mod crossref;
#[cfg(feature = "source-datacite")]
mod datacite;
pub mod mock;
mod resolver;

#[cfg(feature = "source-crossref")]
pub use crossref::CrossRefSource;
#[cfg(feature = "source-datacite")]
pub use datacite::DataCiteSource;
pub use mock::MockSource;
pub use resolver::MetadataResolver;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::models::CitationMetadata;

/// Interface implemented by every metadata source.
///
/// # Implementing a New Source
///
/// 1. Create a struct that implements `MetadataSource`
/// 2. Map the remote record into [`CitationMetadata`], returning
///    [`SourceError::NotFound`] when the DOI is unknown so the resolver moves on
/// 3. Add the source id to [`MetadataResolver::from_config`]
#[async_trait]
pub trait MetadataSource: Send + Sync + std::fmt::Debug {
    /// Unique identifier used in configuration (e.g., "crossref")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Fetch the citation record for a normalized DOI
    async fn fetch(&self, doi: &str) -> Result<CitationMetadata, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The DOI is unknown to the source
    #[error("DOI not found: {0}")]
    NotFound(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// The response body could not be understood
    #[error("Parse error: {0}")]
    Parse(String),

    /// API error from the source
    #[error("API error: {0}")]
    Api(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimit,

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

/// Map a non-success HTTP status to the error the retry layer understands
pub(crate) fn status_error(source: &str, doi: &str, status: StatusCode) -> SourceError {
    match status {
        StatusCode::NOT_FOUND => SourceError::NotFound(doi.to_string()),
        StatusCode::TOO_MANY_REQUESTS => SourceError::RateLimit,
        StatusCode::BAD_REQUEST => {
            SourceError::InvalidRequest(format!("{} rejected DOI {}", source, doi))
        }
        status => SourceError::Api(format!("{} API returned status: {}", source, status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::TransientError;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error("CrossRef", "10.1000/x", StatusCode::NOT_FOUND),
            SourceError::NotFound(doi) if doi == "10.1000/x"
        ));
        assert!(matches!(
            status_error("CrossRef", "10.1000/x", StatusCode::TOO_MANY_REQUESTS),
            SourceError::RateLimit
        ));

        let unavailable = status_error("CrossRef", "10.1000/x", StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            TransientError::from_source_error(&unavailable),
            Some(TransientError::ServerError)
        );

        let forbidden = status_error("CrossRef", "10.1000/x", StatusCode::FORBIDDEN);
        assert_eq!(TransientError::from_source_error(&forbidden), None);
    }
}
