//! # doi-cite
//!
//! Find Digital Object Identifiers in web pages, PDFs and free text, resolve
//! them to bibliographic metadata, and format that metadata as citations.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`doi`]: DOI normalization and detection (text, meta tags, HTML, URLs, PDFs)
//! - [`cite`]: APA, MLA, Chicago, IEEE and Vancouver formatters plus BibTeX
//! - [`models`]: Core data structures (CitationMetadata, Author, detection results)
//! - [`sources`]: CrossRef and DataCite metadata sources behind a resolver
//! - [`utils`]: HTTP client, retry, caching and PDF text extraction
//! - [`config`]: Configuration management

pub mod cite;
pub mod config;
pub mod doi;
pub mod models;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use cite::{CitationFormat, CitationStyle};
pub use models::{Author, CitationMetadata};
pub use sources::{MetadataResolver, MetadataSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
