//! IEEE reference style.

use super::names::{self, EditorLabel, Initials, NameList, Truncation};
use super::{italic_terminated, ordinal_or_default, quoted, title_of, CitationStyle, StyleFormatter};
use crate::models::{Author, CitationMetadata};

const NAMES: NameList = NameList {
    max_names: 6,
    pair: " and ",
    separator: ", ",
    last: ", and ",
    truncation: Truncation::EtAl {
        keep: 6,
        marker: ", et al.",
    },
};

const EDITORS: EditorLabel = EditorLabel {
    singular: "Ed.",
    plural: "Eds.",
};

#[derive(Debug, Clone, Copy, Default)]
pub struct Ieee;

/// `J. P. Family`
fn author_name(author: &Author) -> String {
    names::render_name(author, |family, given| {
        match given.map(|g| names::initials(g, Initials::Spaced)) {
            Some(initials) if !initials.is_empty() => format!("{} {}", initials, family),
            _ => family.to_string(),
        }
    })
}

impl Ieee {
    /// Journal or book details without final punctuation
    fn container_fields(&self, meta: &CitationMetadata) -> Vec<String> {
        if let Some(journal) = meta.journal() {
            let mut fields = vec![format!("<em>{}</em>", journal)];
            fields.extend(meta.volume().map(|v| format!("vol. {}", v)));
            fields.extend(meta.issue().map(|i| format!("no. {}", i)));
            fields.extend(meta.pages().map(|p| format!("pp. {}", p)));
            fields.extend(meta.year().map(str::to_string));
            fields
        } else if meta.is_book() {
            meta.publisher()
                .into_iter()
                .chain(meta.year())
                .map(str::to_string)
                .collect()
        } else {
            meta.year().into_iter().map(str::to_string).collect()
        }
    }

    fn identifier_part(&self, meta: &CitationMetadata) -> Option<String> {
        meta.doi()
            .map(|doi| format!("doi: {}.", doi))
            .or_else(|| meta.url().map(|url| format!("[Online]. Available: {}", url)))
    }
}

impl StyleFormatter for Ieee {
    fn style(&self) -> CitationStyle {
        CitationStyle::Ieee
    }

    fn format_authors(&self, authors: &[Author]) -> String {
        let rendered: Vec<String> = authors.iter().map(author_name).collect();
        NAMES.join(&rendered)
    }

    fn format_reference(&self, meta: &CitationMetadata, ordinal: Option<u32>) -> String {
        let authors = self.format_authors(&meta.authors);
        let author_block = if meta.is_edited_work {
            format!("{}, {},", authors, EDITORS.for_count(meta.authors.len()))
        } else {
            format!("{},", authors)
        };

        let container = self.container_fields(meta);
        let identifier = self.identifier_part(meta);
        let title = title_of(meta);
        let title_part = if meta.is_book() {
            italic_terminated(title)
        } else if container.is_empty() && identifier.is_none() {
            quoted(title, '.')
        } else {
            quoted(title, ',')
        };

        let mut parts = vec![
            format!("[{}]", ordinal_or_default(ordinal)),
            author_block,
            title_part,
        ];
        if !container.is_empty() {
            let end = if identifier.is_some() { ',' } else { '.' };
            parts.push(format!("{}{}", container.join(", "), end));
        }
        parts.extend(identifier);
        parts.join(" ")
    }

    fn in_text_parenthetical(&self, _meta: &CitationMetadata, ordinal: Option<u32>) -> String {
        format!("[{}]", ordinal_or_default(ordinal))
    }

    fn in_text_narrative(&self, meta: &CitationMetadata, ordinal: Option<u32>) -> String {
        let number = self.in_text_parenthetical(meta, ordinal);
        match names::first_author_label(&meta.authors) {
            Some(label) => format!("{} {}", label, number),
            None => number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cite::test_support::*;

    #[test]
    fn test_reference() {
        let mut meta = article();
        meta.issue = Some("7845".to_string());
        assert_eq!(
            Ieee.format_reference(&meta, Some(3)),
            "[3] J. Doe, \"A Study,\" <em>Nature</em>, vol. 590, no. 7845, pp. 123-130, 2021, doi: 10.1038/s41586-021-00001-0."
        );
    }

    #[test]
    fn test_default_ordinal() {
        assert!(Ieee.format_reference(&article(), None).starts_with("[1] "));
    }

    #[test]
    fn test_author_lists() {
        let two = vec![Author::new("Jane", "Doe"), Author::new("John Paul", "Smith")];
        assert_eq!(Ieee.format_authors(&two), "J. Doe and J. P. Smith");
        assert_eq!(
            Ieee.format_authors(&authors(3)),
            "G. Family1, G. Family2, and G. Family3"
        );

        let seven = Ieee.format_authors(&authors(7));
        assert!(seven.ends_with("G. Family6, et al."));
        assert!(!seven.contains("Family7"));
    }

    #[test]
    fn test_url_fallback() {
        let mut meta = article();
        meta.doi = String::new();
        meta.url = Some("https://example.org/a".to_string());
        assert!(Ieee
            .format_reference(&meta, None)
            .ends_with("2021, [Online]. Available: https://example.org/a"));
    }

    #[test]
    fn test_title_closes_bare_entry() {
        let meta = CitationMetadata::builder("", "Lonely")
            .author(Author::new("Jane", "Doe"))
            .build();
        assert_eq!(Ieee.format_reference(&meta, None), "[1] J. Doe, \"Lonely.\"");
    }

    #[test]
    fn test_edited_book() {
        assert_eq!(
            Ieee.format_reference(&book(), Some(2)),
            "[2] A. Editor, Ed., <em>Handbook of Things</em>. Springer, 2019, doi: 10.1007/978-3-030-00001-1."
        );
    }

    #[test]
    fn test_in_text() {
        assert_eq!(Ieee.in_text_parenthetical(&article(), Some(5)), "[5]");
        assert_eq!(Ieee.in_text_narrative(&article(), Some(5)), "Doe [5]");
        assert_eq!(Ieee.in_text_narrative(&three_authors(), None), "Doe et al. [1]");
        assert_eq!(
            Ieee.in_text_narrative(&CitationMetadata::default(), Some(2)),
            "[2]"
        );
    }
}
