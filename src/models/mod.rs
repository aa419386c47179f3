//! Core data models for citation metadata and DOI detection.

mod detection;
mod metadata;

pub use detection::{DetectionSource, DoiDetectionResult, MetaTag};
pub use metadata::{Author, CitationMetadata, CitationMetadataBuilder, ContainerType};
