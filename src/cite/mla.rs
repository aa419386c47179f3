//! MLA 9th edition.

use super::names::{self, EditorLabel, NameList, Truncation};
use super::{italic_terminated, quoted, terminate, title_of, CitationStyle, StyleFormatter};
use crate::models::{Author, CitationMetadata};

const NAMES: NameList = NameList {
    max_names: 2,
    pair: ", and ",
    separator: ", ",
    last: ", and ",
    truncation: Truncation::EtAl {
        keep: 1,
        marker: ", et al",
    },
};

const EDITORS: EditorLabel = EditorLabel {
    singular: "editor",
    plural: "editors",
};

/// MLA works-cited entries and author-only citations
#[derive(Debug, Clone, Copy, Default)]
pub struct Mla;

impl Mla {
    fn author_block(&self, meta: &CitationMetadata) -> String {
        let authors = self.format_authors(&meta.authors);
        if meta.is_edited_work {
            format!("{}, {}.", authors, EDITORS.for_count(meta.authors.len()))
        } else {
            terminate(&authors)
        }
    }

    fn container_part(&self, meta: &CitationMetadata) -> Option<String> {
        let fields: Vec<String> = if let Some(journal) = meta.journal() {
            let mut fields = vec![format!("<em>{}</em>", journal)];
            fields.extend(meta.volume().map(|v| format!("vol. {}", v)));
            fields.extend(meta.issue().map(|i| format!("no. {}", i)));
            fields.extend(meta.year().map(str::to_string));
            fields.extend(meta.pages().map(|p| format!("pp. {}", p)));
            fields
        } else if meta.is_book() {
            meta.publisher()
                .into_iter()
                .chain(meta.year())
                .map(str::to_string)
                .collect()
        } else {
            meta.year().into_iter().map(str::to_string).collect()
        };

        (!fields.is_empty()).then(|| format!("{}.", fields.join(", ")))
    }
}

impl StyleFormatter for Mla {
    fn style(&self) -> CitationStyle {
        CitationStyle::Mla
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
        let title = title_of(meta);
        let mut parts = vec![
            self.author_block(meta),
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

    fn in_text_parenthetical(&self, meta: &CitationMetadata, _ordinal: Option<u32>) -> String {
        format!("({})", names::short_author_label(&meta.authors, "and"))
    }

    fn in_text_narrative(&self, meta: &CitationMetadata, _ordinal: Option<u32>) -> String {
        names::short_author_label(&meta.authors, "and")
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
            Mla.format_reference(&meta, None),
            "Doe, Jane. \"A Study.\" <em>Nature</em>, vol. 590, no. 7845, 2021, pp. 123-130. https://doi.org/10.1038/s41586-021-00001-0."
        );
    }

    #[test]
    fn test_author_lists() {
        let two = vec![Author::new("Jane", "Doe"), Author::new("John", "Smith")];
        assert_eq!(Mla.format_authors(&two), "Doe, Jane, and John Smith");
        assert_eq!(Mla.format_authors(&authors(3)), "Family1, Given1, et al");
        assert_eq!(Mla.format_authors(&[]), "[No author]");
    }

    #[test]
    fn test_et_al_block_is_terminated() {
        let mut meta = article();
        meta.authors = authors(4);
        assert!(Mla
            .format_reference(&meta, None)
            .starts_with("Family1, Given1, et al. \"A Study.\""));
    }

    #[test]
    fn test_edited_book() {
        assert_eq!(
            Mla.format_reference(&book(), None),
            "Editor, Ann, editor. <em>Handbook of Things</em>. Springer, 2019. https://doi.org/10.1007/978-3-030-00001-1."
        );
    }

    #[test]
    fn test_in_text() {
        assert_eq!(Mla.in_text_parenthetical(&article(), None), "(Doe)");
        assert_eq!(Mla.in_text_parenthetical(&two_authors(), None), "(Doe and Smith)");
        assert_eq!(Mla.in_text_parenthetical(&three_authors(), None), "(Doe et al.)");
        assert_eq!(Mla.in_text_narrative(&three_authors(), None), "Doe et al.");
    }
}
