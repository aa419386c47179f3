//! DOI canonicalization and validation.

use regex::Regex;
use std::sync::OnceLock;

/// Shortest complete DOI we accept; `10.1016/S1` style truncations fall below it
const MIN_DOI_LENGTH: usize = 15;

const LEADING_PUNCTUATION: &[char] = &['.', ',', ';', '(', '[', '{', '<'];

fn embedded_doi_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:doi\.org/|/doi/(?:full/|abs/)?)(10\.\d{4,9}/[^?#]+)")
            .expect("embedded DOI pattern is valid")
    })
}

fn prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:https?://(?:dx\.)?doi\.org/|doi:|info:doi/)")
            .expect("DOI prefix pattern is valid")
    })
}

fn trailing_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)www\.|https?://").expect("URL pattern is valid"))
}

fn valid_doi_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^10\.\d{4,9}/.{5,}").expect("DOI pattern is valid"))
}

fn doi_shape_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^10\.\d{4,9}/\S+$").expect("DOI shape pattern is valid"))
}

/// Canonicalize a DOI from a bare identifier, `doi:` form, resolver URL,
/// publisher URL or line-wrapped PDF text.
///
/// Returns `None` when the result is not a complete DOI.
///
/// ```
/// use doi_cite::doi::normalize;
///
/// assert_eq!(
///     normalize("https://doi.org/10.1038/nphys1170").as_deref(),
///     Some("10.1038/nphys1170")
/// );
/// assert_eq!(normalize("10.1016/S1"), None);
/// ```
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();

    let stripped = match embedded_doi_regex().captures(trimmed).and_then(|c| c.get(1)) {
        Some(doi) => doi.as_str(),
        None => prefix_regex()
            .find(trimmed)
            .map_or(trimmed, |prefix| &trimmed[prefix.end()..]),
    };

    // Whitespace goes before trailing-content stripping so wrapped URLs
    // glued to the DOI are still caught below.
    let compact: String = stripped.chars().filter(|c| !c.is_whitespace()).collect();
    let cleaned = trim_punctuation(strip_trailing_url(&compact));

    if is_valid_doi(cleaned) {
        Some(cleaned.to_string())
    } else {
        None
    }
}

/// Check a string against the DOI shape and length floor without rewriting it
pub fn is_valid_doi(doi: &str) -> bool {
    let doi = doi.trim();
    valid_doi_regex().is_match(doi) && doi.chars().count() >= MIN_DOI_LENGTH
}

/// Lightweight cleanup for strict text matches: trailing URL and punctuation
/// removal only, no length floor.
pub(crate) fn clean_candidate(candidate: &str) -> Option<String> {
    let cleaned = trim_punctuation(strip_trailing_url(candidate.trim()));
    doi_shape_regex()
        .is_match(cleaned)
        .then(|| cleaned.to_string())
}

/// Cut at a `www.` or `http(s)://` that follows the DOI without a separator
fn strip_trailing_url(doi: &str) -> &str {
    trailing_url_regex()
        .find_iter(doi)
        .find(|m| m.start() > 0)
        .map_or(doi, |m| &doi[..m.start()])
}

/// Drop leading and trailing punctuation picked up from prose. Closing
/// brackets are only dropped when unbalanced within the DOI.
fn trim_punctuation(doi: &str) -> &str {
    let mut s = doi.trim_start_matches(LEADING_PUNCTUATION);

    while let Some(last) = s.chars().last() {
        let strip = match last {
            '.' | ',' | ';' | '>' => true,
            ')' => is_unbalanced(s, '(', ')'),
            ']' => is_unbalanced(s, '[', ']'),
            '}' => is_unbalanced(s, '{', '}'),
            _ => false,
        };
        if !strip {
            break;
        }
        s = &s[..s.len() - last.len_utf8()];
    }

    s
}

fn is_unbalanced(s: &str, open: char, close: char) -> bool {
    s.matches(close).count() > s.matches(open).count()
}
