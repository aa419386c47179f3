//! DOI detection for remote pages.

use async_trait::async_trait;
use serde_json::Value;

use super::detect::{detect_from_meta_tags, detect_from_text, Document};
use super::html::HtmlDocument;
use super::normalize::normalize;
use super::DetectError;

/// JSON-LD keys that may hold a DOI
const JSON_LD_DOI_KEYS: &[&str] = &["identifier", "@id", "doi"];

/// Fetches the HTML for a page
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_html(&self, url: &str) -> Result<String, DetectError>;
}

/// Find the DOI of the page at `url`
///
/// Candidates are tried in order: meta tags, the URL itself, JSON-LD
/// identifiers, then the page text. The first one that normalizes wins.
/// Fetch failures are returned to the caller untouched.
pub async fn detect_from_url(
    url: &str,
    fetcher: &dyn PageFetcher,
) -> Result<Option<String>, DetectError> {
    let parsed = url::Url::parse(url.trim()).map_err(|e| DetectError::InvalidUrl(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(DetectError::InvalidUrl(format!(
            "unsupported scheme: {}",
            parsed.scheme()
        )));
    }

    let html = fetcher.fetch_html(parsed.as_str()).await?;
    let doc = HtmlDocument::parse(&html);
    let found = detect_in_page(parsed.as_str(), &doc);

    match &found {
        Some(doi) => tracing::debug!("Resolved {} to DOI {}", url, doi),
        None => tracing::debug!("No DOI found at {}", url),
    }
    Ok(found)
}

fn detect_in_page(url: &str, doc: &HtmlDocument) -> Option<String> {
    if let Some(doi) = detect_from_meta_tags(&doc.meta_tags()).into_iter().next() {
        return Some(doi);
    }

    if let Some(doi) = doi_in_url(url) {
        return Some(doi);
    }

    let from_json_ld = doc.json_ld_blocks().iter().find_map(|block| {
        match serde_json::from_str::<Value>(block) {
            Ok(value) => json_ld_doi(&value),
            Err(e) => {
                tracing::debug!("Skipping malformed JSON-LD block: {}", e);
                None
            }
        }
    });
    if from_json_ld.is_some() {
        return from_json_ld;
    }

    detect_from_text(&doc.body_text())
        .iter()
        .find_map(|candidate| normalize(candidate))
}

/// A DOI carried in the URL path, percent-encoded or not
///
/// Query parameters and fragments never belong to the DOI.
fn doi_in_url(url: &str) -> Option<String> {
    let location = match url::Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => url.split(['?', '#']).next().unwrap_or(url).to_string(),
    };
    let decoded = urlencoding::decode(&location)
        .map(|s| s.into_owned())
        .unwrap_or(location);

    normalize(&decoded).or_else(|| {
        detect_from_text(&decoded)
            .iter()
            .find_map(|candidate| normalize(candidate))
    })
}

/// Depth-first search for a DOI under any of the known keys
fn json_ld_doi(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => {
            let direct = JSON_LD_DOI_KEYS
                .iter()
                .filter_map(|key| map.get(*key))
                .find_map(identifier_value);
            direct.or_else(|| map.values().find_map(json_ld_doi))
        }
        Value::Array(items) => items.iter().find_map(json_ld_doi),
        _ => None,
    }
}

/// Interpret an identifier field: a string, a `PropertyValue` object, or a list
fn identifier_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => normalize(s),
        Value::Object(map) => map
            .get("value")
            .or_else(|| map.get("@id"))
            .and_then(identifier_value),
        Value::Array(items) => items.iter().find_map(identifier_value),
        _ => None,
    }
}
