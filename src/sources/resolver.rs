//! Ordered, cached DOI metadata resolution.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::doi::normalize;
use crate::models::CitationMetadata;
use crate::sources::{MetadataSource, SourceError};
use crate::utils::{CacheResult, FileStore, HttpClient, KeyValueStore};

/// Tries metadata sources in order until one knows the DOI.
///
/// Records are cached as JSON under `metadata:<doi>`. A source answering
/// [`SourceError::NotFound`] hands over to the next one; other failures are
/// remembered and returned only when no source succeeds.
#[derive(Debug, Clone, Default)]
pub struct MetadataResolver {
    sources: Vec<Arc<dyn MetadataSource>>,
    cache: Option<Arc<dyn KeyValueStore>>,
    ttl: Duration,
}

impl MetadataResolver {
    /// Create a resolver with no sources and no cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the sources named in `[sources].order`, sharing one HTTP client,
    /// and the file cache when `[cache].enabled` is set
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let client = HttpClient::from_config(&config.http)?;
        let mut resolver = Self::new();

        for id in &config.sources.order {
            match id.trim().to_lowercase().as_str() {
                #[cfg(feature = "source-crossref")]
                "crossref" => {
                    resolver = resolver.with_source(Arc::new(super::CrossRefSource::with_client(
                        client.clone(),
                    )))
                }
                #[cfg(feature = "source-datacite")]
                "datacite" => {
                    resolver = resolver.with_source(Arc::new(super::DataCiteSource::with_client(
                        client.clone(),
                    )))
                }
                other => tracing::warn!("Unknown or disabled metadata source: {}", other),
            }
        }

        if config.cache.enabled {
            let store = FileStore::from_config(&config.cache)?;
            resolver = resolver.with_cache(
                Arc::new(store),
                Duration::from_secs(config.cache.metadata_ttl_seconds),
            );
        }

        Ok(resolver)
    }

    /// Append a source to the lookup order
    pub fn with_source(mut self, source: Arc<dyn MetadataSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Cache resolved records for `ttl`
    pub fn with_cache(mut self, store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        self.cache = Some(store);
        self.ttl = ttl;
        self
    }

    /// Ids of the configured sources, in lookup order
    pub fn source_ids(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.id()).collect()
    }

    fn cache_key(doi: &str) -> String {
        format!("metadata:{}", doi.to_lowercase())
    }

    fn cached(&self, key: &str) -> Option<CitationMetadata> {
        let cache = self.cache.as_ref()?;
        let json = cache.get(key).hit()?;
        match serde_json::from_str(&json) {
            Ok(meta) => Some(meta),
            Err(e) => {
                tracing::debug!("Discarding unreadable cache entry {}: {}", key, e);
                cache.remove(key);
                None
            }
        }
    }

    fn store(&self, key: &str, meta: &CitationMetadata) {
        let Some(cache) = &self.cache else {
            return;
        };
        match serde_json::to_string(meta) {
            Ok(json) => cache.set(key, &json, self.ttl),
            Err(e) => tracing::warn!("Failed to serialize metadata for {}: {}", key, e),
        }
    }

    /// Resolve any DOI form accepted by [`normalize`] into a citation record
    pub async fn resolve(&self, input: &str) -> Result<CitationMetadata, SourceError> {
        let doi = normalize(input)
            .ok_or_else(|| SourceError::InvalidRequest(format!("Not a valid DOI: {}", input)))?;

        let key = Self::cache_key(&doi);
        if let Some(meta) = self.cached(&key) {
            tracing::debug!("Using cached metadata for {}", doi);
            return Ok(meta);
        }

        if self.sources.is_empty() {
            return Err(SourceError::Other(
                "No metadata sources configured".to_string(),
            ));
        }

        let mut last_error = None;
        for source in &self.sources {
            match source.fetch(&doi).await {
                Ok(meta) => {
                    tracing::info!("Resolved {} via {}", doi, source.name());
                    self.store(&key, &meta);
                    return Ok(meta);
                }
                Err(SourceError::NotFound(_)) => {
                    tracing::debug!("{} does not know {}", source.name(), doi);
                }
                Err(e) => {
                    tracing::warn!("{} failed for {}: {}", source.name(), doi, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(SourceError::NotFound(doi)))
    }
}
