//! Parsed HTML pages as recognizer input.

use scraper::{Html, Selector};

use super::detect::Document;
use crate::models::MetaTag;

/// Elements whose text is never shown to the reader
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// A parsed HTML page
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parse a full HTML document
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// Raw bodies of every `application/ld+json` script block
    pub fn json_ld_blocks(&self) -> Vec<String> {
        let Ok(selector) = Selector::parse(r#"script[type="application/ld+json"]"#) else {
            return Vec::new();
        };

        self.html
            .select(&selector)
            .map(|script| script.text().collect::<String>())
            .filter(|body| !body.trim().is_empty())
            .collect()
    }
}

impl std::fmt::Debug for HtmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlDocument").finish_non_exhaustive()
    }
}

impl Document for HtmlDocument {
    fn meta_tags(&self) -> Vec<MetaTag> {
        let Ok(selector) = Selector::parse("meta") else {
            return Vec::new();
        };

        self.html
            .select(&selector)
            .filter_map(|meta| {
                let element = meta.value();
                let content = element.attr("content")?;
                Some(MetaTag {
                    name: element.attr("name").map(str::to_string),
                    property: element.attr("property").map(str::to_string),
                    content: content.to_string(),
                })
            })
            .collect()
    }

    fn body_text(&self) -> String {
        let body = Selector::parse("body")
            .ok()
            .and_then(|selector| self.html.select(&selector).next())
            .unwrap_or_else(|| self.html.root_element());

        let mut text = String::new();
        for node in body.descendants() {
            let Some(chunk) = node.value().as_text() else {
                continue;
            };
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
            });
            if !hidden {
                text.push_str(chunk);
                text.push('\n');
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doi::detect_from_document;
    use crate::models::DetectionSource;

    const ARTICLE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta name="citation_title" content="Measured measurement">
  <meta name="citation_doi" content="10.1038/nphys1170">
  <meta property="og:title" content="Measured measurement">
</head>
<body><p>Body text</p></body>
</html>"#;

    const PLAIN_PAGE: &str = r#"<html>
<head><title>Blog</title></head>
<body>
  <script>var doi = "10.9999/hidden.script.value";</script>
  <p>Read the paper at <a href="https://doi.org/10.1016/j.cell.2020.01.001">doi:10.1016/j.cell.2020.01.001</a>.</p>
</body>
</html>"#;

    #[test]
    fn test_meta_tags_are_extracted() {
        let doc = HtmlDocument::parse(ARTICLE_PAGE);
        let tags = doc.meta_tags();
        assert_eq!(tags.len(), 3);
        assert!(tags[1].is_keyed("citation_doi"));
        assert_eq!(tags[1].content, "10.1038/nphys1170");
        assert_eq!(tags[2].property.as_deref(), Some("og:title"));
    }

    #[test]
    fn test_detect_from_html_meta_tags() {
        let result = detect_from_document(&HtmlDocument::parse(ARTICLE_PAGE));
        assert_eq!(result.source, DetectionSource::MetaTag);
        assert_eq!(result.dois, vec!["10.1038/nphys1170"]);
    }

    #[test]
    fn test_body_text_skips_scripts() {
        let doc = HtmlDocument::parse(PLAIN_PAGE);
        let text = doc.body_text();
        assert!(text.contains("Read the paper at"));
        assert!(!text.contains("hidden.script"));

        let result = detect_from_document(&doc);
        assert_eq!(result.source, DetectionSource::Regex);
        assert_eq!(result.dois, vec!["10.1016/j.cell.2020.01.001"]);
    }

    #[test]
    fn test_json_ld_blocks() {
        let page = r#"<html><head>
<script type="application/ld+json">{"@type": "ScholarlyArticle", "identifier": "10.1038/nphys1170"}</script>
</head><body></body></html>"#;
        let blocks = HtmlDocument::parse(page).json_ld_blocks();
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].contains("ScholarlyArticle"));
    }
}
