//! DOI detection results and page metadata inputs.

use serde::{Deserialize, Serialize};

/// Where a set of detected DOIs came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionSource {
    /// Structured `<meta>` tags
    MetaTag,
    /// Pattern scan over visible text
    Regex,
    /// Text extracted from a PDF
    Pdf,
    /// A remote page fetched by URL
    Url,
    /// Typed or pasted by the user
    Manual,
}

impl DetectionSource {
    /// Returns the identifier shown in diagnostics
    pub fn id(&self) -> &'static str {
        match self {
            DetectionSource::MetaTag => "meta-tag",
            DetectionSource::Regex => "regex",
            DetectionSource::Pdf => "pdf",
            DetectionSource::Url => "url",
            DetectionSource::Manual => "manual",
        }
    }
}

impl std::fmt::Display for DetectionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Ordered, case-insensitively de-duplicated DOIs plus their provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoiDetectionResult {
    pub dois: Vec<String>,
    pub source: DetectionSource,
}

impl DoiDetectionResult {
    pub fn new(dois: Vec<String>, source: DetectionSource) -> Self {
        Self { dois, source }
    }

    /// First detected DOI, if any
    pub fn first(&self) -> Option<&str> {
        self.dois.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.dois.is_empty()
    }
}

/// A single `<meta>` element as seen by the recognizer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaTag {
    /// Value of the `name=` attribute
    #[serde(default)]
    pub name: Option<String>,

    /// Value of the `property=` attribute
    #[serde(default)]
    pub property: Option<String>,

    #[serde(default)]
    pub content: String,
}

impl MetaTag {
    /// A tag using the `name=` form
    pub fn named(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            property: None,
            content: content.into(),
        }
    }

    /// A tag using the `property=` form
    pub fn property(property: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: None,
            property: Some(property.into()),
            content: content.into(),
        }
    }

    /// Whether either attribute equals `key`, ignoring ASCII case
    pub fn is_keyed(&self, key: &str) -> bool {
        [self.name.as_deref(), self.property.as_deref()]
            .into_iter()
            .flatten()
            .any(|attr| attr.trim().eq_ignore_ascii_case(key))
    }
}
