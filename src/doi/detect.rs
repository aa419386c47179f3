//! DOI detection over meta tags, free text and parsed documents.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use super::normalize::{clean_candidate, normalize};
use crate::models::{DetectionSource, DoiDetectionResult, MetaTag};

/// Meta tag names that carry a DOI, matched against `name=` and `property=`
/// without regard to case.
pub const DOI_META_TAGS: &[&str] = &[
    "citation_doi",
    "dc.identifier",
    "prism.doi",
    "bepress_citation_doi",
    "rft.id",
];

/// Upper bound on a loosely matched DOI suffix, continuation included
const MAX_LOOSE_LENGTH: usize = 100;

fn strict_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\b10\.\d{4,9}/[^\s"'<>]+"#).expect("strict DOI pattern is valid")
    })
}

fn loose_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)(?:doi:\s*)?\b(?P<head>10\.\d{4,9}/[\w\-.()/]{3,100})(?P<tail>[ \t]*\r?\n[ \t]*[\w\-.()/]{1,100})?",
        )
        .expect("loose DOI pattern is valid")
    })
}

/// Something the recognizer can read meta tags and visible text from
pub trait Document {
    /// All `<meta>` elements in document order
    fn meta_tags(&self) -> Vec<MetaTag>;

    /// Visible body text
    fn body_text(&self) -> String;
}

/// Collect DOIs from known DOI-carrying meta tags, in document order
pub fn detect_from_meta_tags(tags: &[MetaTag]) -> Vec<String> {
    let dois = tags
        .iter()
        .filter(|tag| DOI_META_TAGS.iter().any(|key| tag.is_keyed(key)))
        .filter_map(|tag| normalize(&tag.content));

    dedup_case_insensitive(dois)
}

/// Scan free text for DOIs
///
/// A strict pass picks up well-delimited identifiers; a loose pass recovers
/// DOIs that PDF extraction wrapped across lines and re-validates them with
/// [`normalize`]. When both passes find a candidate at the same offset the
/// longer one wins.
pub fn detect_from_text(text: &str) -> Vec<String> {
    let mut candidates: Vec<(usize, String)> = strict_regex()
        .find_iter(text)
        .filter_map(|m| clean_candidate(m.as_str()).map(|doi| (m.start(), doi)))
        .collect();

    for caps in loose_regex().captures_iter(text) {
        let Some(head) = caps.name("head") else {
            continue;
        };
        let joined = match caps.name("tail") {
            Some(tail) if continues_on_next_line(head.as_str()) => {
                format!("{}{}", head.as_str(), tail.as_str())
            }
            _ => head.as_str().to_string(),
        };
        let suffix_len = joined.split_once('/').map_or(0, |(_, suffix)| suffix.len());
        if suffix_len > MAX_LOOSE_LENGTH {
            continue;
        }
        if let Some(doi) = normalize(&joined) {
            candidates.push((head.start(), doi));
        }
    }

    // Stable sort keeps strict matches ahead of loose ones at equal offsets.
    candidates.sort_by_key(|(start, _)| *start);

    let mut longest: Vec<(usize, String)> = Vec::with_capacity(candidates.len());
    for (start, doi) in candidates {
        match longest.last_mut() {
            Some((prev, current)) if *prev == start => {
                if doi.len() > current.len() {
                    *current = doi;
                }
            }
            _ => longest.push((start, doi)),
        }
    }

    let dois = dedup_case_insensitive(longest.into_iter().map(|(_, doi)| doi));
    tracing::debug!("Detected {} DOI(s) in {} bytes of text", dois.len(), text.len());
    dois
}

/// Prefer structured metadata; fall back to scanning the visible text
pub fn detect_from_document<D: Document + ?Sized>(doc: &D) -> DoiDetectionResult {
    let from_meta = detect_from_meta_tags(&doc.meta_tags());
    if !from_meta.is_empty() {
        tracing::debug!("Found {} DOI(s) in meta tags", from_meta.len());
        return DoiDetectionResult::new(from_meta, DetectionSource::MetaTag);
    }

    DoiDetectionResult::new(detect_from_text(&doc.body_text()), DetectionSource::Regex)
}

/// Scan text extracted from a PDF
pub fn detect_from_pdf_text(text: &str) -> DoiDetectionResult {
    DoiDetectionResult::new(detect_from_text(text), DetectionSource::Pdf)
}

/// Normalize a DOI typed or pasted by the user
pub fn detect_manual(input: &str) -> DoiDetectionResult {
    DoiDetectionResult::new(normalize(input).into_iter().collect(), DetectionSource::Manual)
}

/// A wrapped DOI line ends in a character that cannot end a DOI in prose
fn continues_on_next_line(head: &str) -> bool {
    head.ends_with(['-', '.', '/', '_', '('])
}

fn dedup_case_insensitive(dois: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    dois.into_iter()
        .filter(|doi| seen.insert(doi.to_lowercase()))
        .collect()
}
