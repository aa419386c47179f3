//! APA 7th edition.

use super::casing::{sentence_case, title_case};
use super::names::{self, EditorLabel, Initials, NameList, Truncation};
use super::{italic_terminated, terminate, title_of, CitationStyle, StyleFormatter};
use crate::models::{Author, CitationMetadata};

const NAMES: NameList = NameList {
    max_names: 20,
    pair: ", & ",
    separator: ", ",
    last: ", & ",
    truncation: Truncation::Ellipsis {
        keep: 19,
        marker: ", ... ",
    },
};

const EDITORS: EditorLabel = EditorLabel {
    singular: "Ed.",
    plural: "Eds.",
};

/// APA reference and author-date citations
#[derive(Debug, Clone, Copy, Default)]
pub struct Apa;

/// `Family, J. P.`
fn author_name(author: &Author) -> String {
    names::render_name(author, |family, given| {
        match given.map(|g| names::initials(g, Initials::Spaced)) {
            Some(initials) if !initials.is_empty() => format!("{}, {}", family, initials),
            _ => family.to_string(),
        }
    })
}

impl Apa {
    fn author_block(&self, meta: &CitationMetadata) -> String {
        let authors = self.format_authors(&meta.authors);
        if meta.is_edited_work {
            format!("{} ({}).", authors, EDITORS.for_count(meta.authors.len()))
        } else {
            terminate(&authors)
        }
    }

    fn title_part(&self, meta: &CitationMetadata) -> String {
        let title = meta
            .title()
            .map(sentence_case)
            .unwrap_or_else(|| title_of(meta).to_string());
        if meta.is_book() {
            italic_terminated(&title)
        } else {
            terminate(&title)
        }
    }

    fn container_part(&self, meta: &CitationMetadata) -> Option<String> {
        if let Some(journal) = meta.journal() {
            let mut out = format!("<em>{}</em>", title_case(journal));
            match (meta.volume(), meta.issue()) {
                (Some(volume), Some(issue)) => {
                    out.push_str(&format!(", <em>{}</em>({})", volume, issue))
                }
                (Some(volume), None) => out.push_str(&format!(", <em>{}</em>", volume)),
                (None, Some(issue)) => out.push_str(&format!(", ({})", issue)),
                (None, None) => {}
            }
            if let Some(pages) = meta.pages() {
                out.push_str(&format!(", {}", pages));
            }
            out.push('.');
            return Some(out);
        }

        if meta.is_book() {
            return meta.publisher().map(terminate);
        }
        None
    }

    fn identifier_part(&self, meta: &CitationMetadata) -> Option<String> {
        meta.doi()
            .map(|doi| format!("https://doi.org/{}", doi))
            .or_else(|| meta.url().map(str::to_string))
    }

    fn year(meta: &CitationMetadata) -> &str {
        meta.year().unwrap_or("n.d.")
    }
}

impl StyleFormatter for Apa {
    fn style(&self) -> CitationStyle {
        CitationStyle::Apa
    }

    fn format_authors(&self, authors: &[Author]) -> String {
        let rendered: Vec<String> = authors.iter().map(author_name).collect();
        NAMES.join(&rendered)
    }

    fn format_reference(&self, meta: &CitationMetadata, _ordinal: Option<u32>) -> String {
        let mut parts = vec![
            self.author_block(meta),
            format!("({}).", Self::year(meta)),
            self.title_part(meta),
        ];
        parts.extend(self.container_part(meta));
        parts.extend(self.identifier_part(meta));
        parts.join(" ")
    }

    fn in_text_parenthetical(&self, meta: &CitationMetadata, _ordinal: Option<u32>) -> String {
        format!(
            "({}, {})",
            names::short_author_label(&meta.authors, "&"),
            Self::year(meta)
        )
    }

    fn in_text_narrative(&self, meta: &CitationMetadata, _ordinal: Option<u32>) -> String {
        format!(
            "{} ({})",
            names::short_author_label(&meta.authors, "and"),
            Self::year(meta)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cite::test_support::*;

    #[test]
    fn test_reference_scenario() {
        assert_eq!(
            Apa.format_reference(&article(), None),
            "Doe, J. (2021). A study. <em>Nature</em>, <em>590</em>, 123-130. https://doi.org/10.1038/s41586-021-00001-0"
        );
    }

    #[test]
    fn test_two_authors() {
        let authors = vec![Author::new("Jane", "Doe"), Author::new("John Paul", "Smith")];
        assert_eq!(Apa.format_authors(&authors), "Doe, J., & Smith, J. P.");
    }

    #[test]
    fn test_twenty_authors_are_listed() {
        let formatted = Apa.format_authors(&authors(20));
        assert!(formatted.ends_with(", & Family20, G."));
        assert!(!formatted.contains("..."));
    }

    #[test]
    fn test_twenty_two_authors_truncate() {
        let formatted = Apa.format_authors(&authors(22));
        let expected_head: Vec<String> = (1..=19).map(|i| format!("Family{}, G.", i)).collect();
        assert_eq!(
            formatted,
            format!("{}, ... Family22, G.", expected_head.join(", "))
        );
        assert!(!formatted.contains('&'));
    }

    #[test]
    fn test_hyphenated_initials() {
        let authors = vec![Author::new("Jean-Luc", "Picard")];
        assert_eq!(Apa.format_authors(&authors), "Picard, J.-L.");
    }

    #[test]
    fn test_issue_and_title_case() {
        let mut meta = article();
        meta.issue = Some("7845".to_string());
        meta.journal = Some("journal of the american chemical society".to_string());
        let reference = Apa.format_reference(&meta, None);
        assert!(reference.contains(
            "<em>Journal of the American Chemical Society</em>, <em>590</em>(7845), 123-130."
        ));
    }

    #[test]
    fn test_edited_book() {
        assert_eq!(
            Apa.format_reference(&book(), None),
            "Editor, A. (Ed.). (2019). <em>Handbook of things</em>. Springer. https://doi.org/10.1007/978-3-030-00001-1"
        );

        let mut meta = book();
        meta.authors.push(Author::new("Bob", "Second"));
        assert!(Apa
            .format_reference(&meta, None)
            .starts_with("Editor, A., & Second, B. (Eds.). (2019)."));
    }

    #[test]
    fn test_missing_year_and_doi_uses_url() {
        let mut meta = article();
        meta.year = None;
        meta.doi = String::new();
        meta.url = Some("https://example.org/paper".to_string());
        let reference = Apa.format_reference(&meta, None);
        assert!(reference.contains("(n.d.)."));
        assert!(reference.ends_with("123-130. https://example.org/paper"));
    }

    #[test]
    fn test_in_text() {
        assert_eq!(Apa.in_text_parenthetical(&article(), None), "(Doe, 2021)");
        assert_eq!(Apa.in_text_parenthetical(&two_authors(), None), "(Doe & Smith, 2021)");
        assert_eq!(Apa.in_text_parenthetical(&three_authors(), None), "(Doe et al., 2021)");
        assert_eq!(Apa.in_text_narrative(&article(), None), "Doe (2021)");
        assert_eq!(Apa.in_text_narrative(&two_authors(), None), "Doe and Smith (2021)");
        assert_eq!(Apa.in_text_narrative(&three_authors(), None), "Doe et al. (2021)");
    }

    #[test]
    fn test_unknown_author() {
        let mut meta = article();
        meta.authors = vec![Author::default()];
        assert!(Apa.format_reference(&meta, None).starts_with("[Unknown]. (2021)."));
        assert_eq!(Apa.in_text_parenthetical(&meta, None), "(Unknown, 2021)");
    }
}
