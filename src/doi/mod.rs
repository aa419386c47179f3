//! DOI recognition: detection, extraction and canonicalization.
//!
//! - [`normalize`]: canonicalize a single candidate (bare DOI, `doi:` form,
//!   resolver or publisher URL, line-wrapped PDF text)
//! - [`detect_from_meta_tags`], [`detect_from_text`], [`detect_from_document`]:
//!   synchronous scans that never fail
//! - [`detect_from_url`]: fetch a page through a [`PageFetcher`] and look for
//!   its DOI in meta tags, the URL, JSON-LD and the page text
//! - [`detect_from_pdf`]: extract PDF text and scan it
//!
//! ```rust
//! use doi_cite::doi::detect_from_text;
//!
//! let dois = detect_from_text("See doi:10.1038/nphys1170 and https://doi.org/10.1038/nphys1170.");
//! assert_eq!(dois, vec!["10.1038/nphys1170"]);
//! ```

mod detect;
mod html;
mod normalize;
mod remote;

pub use detect::{
    detect_from_document, detect_from_meta_tags, detect_from_pdf_text, detect_from_text,
    detect_manual, Document, DOI_META_TAGS,
};
pub use html::HtmlDocument;
pub use normalize::{is_valid_doi, normalize};
pub use remote::{detect_from_url, PageFetcher};

use std::path::Path;

use crate::models::DoiDetectionResult;
use crate::utils::{extract_text, PdfExtractError};

/// Errors from detection paths that touch the network or the file system
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    /// The page URL could not be parsed or uses an unsupported scheme
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Fetching the page failed
    #[error("Network error: {0}")]
    Network(String),

    /// The fetched content could not be read
    #[error("Parse error: {0}")]
    Parse(String),

    /// PDF text extraction failed
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfExtractError),
}

impl From<reqwest::Error> for DetectError {
    fn from(err: reqwest::Error) -> Self {
        DetectError::Network(err.to_string())
    }
}

/// Extract the text of a PDF file and scan it for DOIs
pub fn detect_from_pdf(path: &Path) -> Result<DoiDetectionResult, DetectError> {
    let text = extract_text(path)?;
    Ok(detect_from_pdf_text(&text))
}
