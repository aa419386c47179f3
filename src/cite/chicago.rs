//! Chicago bibliography entries with numbered in-text references.

use super::names::{self, EditorLabel, NameList, Truncation};
use super::{
    italic_terminated, ordinal_or_default, quoted, terminate, title_of, CitationStyle,
    StyleFormatter,
};
use crate::models::{Author, CitationMetadata};

const NAMES: NameList = NameList {
    max_names: 10,
    pair: ", and ",
    separator: ", ",
    last: ", and ",
    truncation: Truncation::EtAl {
        keep: 7,
        marker: ", et al",
    },
};

const EDITORS: EditorLabel = EditorLabel {
    singular: "ed",
    plural: "eds",
};

#[derive(Debug, Clone, Copy, Default)]
pub struct Chicago;

impl Chicago {
    fn container_part(&self, meta: &CitationMetadata) -> Option<String> {
        if let Some(journal) = meta.journal() {
            let mut out = format!("<em>{}</em>", journal);
            if let Some(volume) = meta.volume() {
                out.push_str(&format!(" {}", volume));
            }
            if let Some(issue) = meta.issue() {
                out.push_str(&format!(", no. {}", issue));
            }
            if let Some(year) = meta.year() {
                out.push_str(&format!(" ({})", year));
            }
            if let Some(pages) = meta.pages() {
                out.push_str(&format!(": {}", pages));
            }
            out.push('.');
            return Some(out);
        }

        let fields: Vec<&str> = if meta.is_book() {
            meta.publisher().into_iter().chain(meta.year()).collect()
        } else {
            meta.year().into_iter().collect()
        };
        (!fields.is_empty()).then(|| format!("{}.", fields.join(", ")))
    }

    fn narrative_prefix(meta: &CitationMetadata) -> String {
        names::first_author_label(&meta.authors).unwrap_or_default()
    }
}

impl StyleFormatter for Chicago {
    fn style(&self) -> CitationStyle {
        CitationStyle::Chicago
    }

    fn format_authors(&self, authors: &[Author]) -> String {
        let rendered: Vec<String> = authors
            .iter()
            .enumerate()
            .map(|(i, author)| {
                if i == 0 {
                    names::inverted(author)
                } else {
                    names::natural(author)
                }
            })
            .collect();
        NAMES.join(&rendered)
    }

    fn format_reference(&self, meta: &CitationMetadata, _ordinal: Option<u32>) -> String {
        let authors = self.format_authors(&meta.authors);
        let author_block = if meta.is_edited_work {
            format!("{}, {}.", authors, EDITORS.for_count(meta.authors.len()))
        } else {
            terminate(&authors)
        };

        let title = title_of(meta);
        let mut parts = vec![
            author_block,
            if meta.is_book() {
                italic_terminated(title)
            } else {
                quoted(title, '.')
            },
        ];
        parts.extend(self.container_part(meta));
        if let Some(doi) = meta.doi() {
            parts.push(format!("https://doi.org/{}.", doi));
        } else if let Some(url) = meta.url() {
            parts.push(format!("{}.", url));
        }
        parts.join(" ")
    }

    fn in_text_parenthetical(&self, _meta: &CitationMetadata, ordinal: Option<u32>) -> String {
        format!("[{}]", ordinal_or_default(ordinal))
    }

    fn in_text_narrative(&self, meta: &CitationMetadata, ordinal: Option<u32>) -> String {
        format!(
            "{}{}",
            Self::narrative_prefix(meta),
            self.in_text_parenthetical(meta, ordinal)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cite::test_support::*;

    #[test]
    fn test_reference() {
        let mut meta = two_authors();
        meta.issue = Some("7845".to_string());
        assert_eq!(
            Chicago.format_reference(&meta, None),
            "Doe, Jane, and John Smith. \"A Study.\" <em>Nature</em> 590, no. 7845 (2021): 123-130. https://doi.org/10.1038/s41586-021-00001-0."
        );
    }

    #[test]
    fn test_oxford_comma_list() {
        assert_eq!(
            Chicago.format_authors(&authors(3)),
            "Family1, Given1, Given2 Family2, and Given3 Family3"
        );
    }

    #[test]
    fn test_truncation() {
        let ten = Chicago.format_authors(&authors(10));
        assert!(ten.ends_with(", and Given10 Family10"));

        let eleven = Chicago.format_authors(&authors(11));
        assert_eq!(eleven.matches(", ").count(), 8);
        assert!(eleven.ends_with("Given7 Family7, et al"));
        assert!(!eleven.contains("Family8"));
    }

    #[test]
    fn test_edited_book() {
        let mut meta = book();
        meta.authors.push(Author::new("Bob", "Second"));
        assert_eq!(
            Chicago.format_reference(&meta, None),
            "Editor, Ann, and Bob Second, eds. <em>Handbook of Things</em>. Springer, 2019. https://doi.org/10.1007/978-3-030-00001-1."
        );
    }

    #[test]
    fn test_in_text() {
        assert_eq!(Chicago.in_text_parenthetical(&article(), Some(4)), "[4]");
        assert_eq!(Chicago.in_text_narrative(&article(), None), "Doe[1]");
        assert_eq!(Chicago.in_text_narrative(&two_authors(), Some(2)), "Doe et al.[2]");
    }
}
