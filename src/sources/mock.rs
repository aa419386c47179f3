//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::models::CitationMetadata;
use crate::sources::{MetadataSource, SourceError};

/// A mock source that serves predefined records.
///
/// Unknown DOIs yield [`SourceError::NotFound`]; an unavailable mock fails
/// every request with a network error.
#[derive(Debug, Default)]
pub struct MockSource {
    id: String,
    records: Mutex<HashMap<String, CitationMetadata>>,
    unavailable: bool,
    calls: AtomicUsize,
}

impl MockSource {
    /// Create a new mock source.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// A mock whose every request fails with a network error.
    pub fn unavailable(id: impl Into<String>) -> Self {
        Self {
            unavailable: true,
            ..Self::new(id)
        }
    }

    /// Add a record, keyed by its DOI.
    pub fn with_record(self, meta: CitationMetadata) -> Self {
        self.insert(meta);
        self
    }

    /// Add or replace a record.
    pub fn insert(&self, meta: CitationMetadata) {
        if let Ok(mut records) = self.records.lock() {
            records.insert(meta.doi.to_lowercase(), meta);
        }
    }

    /// Number of fetches served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataSource for MockSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn fetch(&self, doi: &str) -> Result<CitationMetadata, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.unavailable {
            return Err(SourceError::Network(format!("{} is unavailable", self.id)));
        }

        let records = self
            .records
            .lock()
            .map_err(|e| SourceError::Other(e.to_string()))?;
        records
            .get(&doi.to_lowercase())
            .cloned()
            .ok_or_else(|| SourceError::NotFound(doi.to_string()))
    }
}
