//! PDF text extraction for DOI scanning.
//!
//! Text comes from the pdf-extract crate. Line breaks inside identifiers are
//! left in place; the recognizer rejoins wrapped DOIs itself.

use std::path::Path;
use thiserror::Error;

/// Errors that can occur during PDF extraction
#[derive(Debug, Error)]
pub enum PdfExtractError {
    #[error("Failed to extract text from PDF: {0}")]
    ExtractionFailed(String),

    #[error("File not found or not a valid PDF: {0}")]
    InvalidFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extract text from a PDF file.
///
/// Scanned, image-only PDFs yield empty text rather than an error.
pub fn extract_text(path: &Path) -> Result<String, PdfExtractError> {
    if !path.exists() {
        return Err(PdfExtractError::InvalidFile(format!(
            "File not found: {}",
            path.display()
        )));
    }

    if !path.is_file() {
        return Err(PdfExtractError::InvalidFile(format!(
            "Not a file: {}",
            path.display()
        )));
    }

    let bytes = std::fs::read(path)?;
    if !bytes.starts_with(b"%PDF") {
        return Err(PdfExtractError::InvalidFile(format!(
            "Missing PDF header: {}",
            path.display()
        )));
    }

    let text = pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| PdfExtractError::ExtractionFailed(e.to_string()))?;

    if text.trim().is_empty() {
        tracing::debug!("Extracted empty text from PDF: {}", path.display());
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_nonexistent_file() {
        let result = extract_text(Path::new("/nonexistent/file.pdf"));
        assert!(matches!(result, Err(PdfExtractError::InvalidFile(_))));
    }

    #[test]
    fn test_extract_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = extract_text(dir.path());
        assert!(matches!(result, Err(PdfExtractError::InvalidFile(_))));
    }

    #[test]
    fn test_extract_non_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, "plain text, not a PDF").unwrap();
        assert!(matches!(extract_text(&path), Err(PdfExtractError::InvalidFile(_))));
    }
}
