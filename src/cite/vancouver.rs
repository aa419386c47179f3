//! Vancouver (ICMJE) reference style.

use super::names::{self, Initials, NameList, Truncation};
use super::{ordinal_or_default, terminate, title_of, CitationStyle, StyleFormatter};
use crate::models::{Author, CitationMetadata};

const NAMES: NameList = NameList {
    max_names: 6,
    pair: ", ",
    separator: ", ",
    last: ", ",
    truncation: Truncation::EtAl {
        keep: 6,
        marker: ", et al",
    },
};

#[derive(Debug, Clone, Copy, Default)]
pub struct Vancouver;

/// `Family JP`
fn author_name(author: &Author) -> String {
    names::render_name(author, |family, given| {
        match given.map(|g| names::initials(g, Initials::Compact)) {
            Some(initials) if !initials.is_empty() => format!("{} {}", family, initials),
            _ => family.to_string(),
        }
    })
}

impl Vancouver {
    fn container_part(&self, meta: &CitationMetadata) -> Option<String> {
        let Some(journal) = meta.journal() else {
            let fields: Vec<&str> = if meta.is_book() {
                meta.publisher().into_iter().chain(meta.year()).collect()
            } else {
                meta.year().into_iter().collect()
            };
            return (!fields.is_empty()).then(|| format!("{}.", fields.join("; ")));
        };

        let mut details = meta.year().unwrap_or_default().to_string();
        if let Some(volume) = meta.volume() {
            if !details.is_empty() {
                details.push(';');
            }
            details.push_str(volume);
        }
        if let Some(issue) = meta.issue() {
            details.push_str(&format!("({})", issue));
        }
        if let Some(pages) = meta.pages() {
            if !details.is_empty() {
                details.push(':');
            }
            details.push_str(pages);
        }

        Some(if details.is_empty() {
            terminate(journal)
        } else {
            format!("{}. {}.", journal.trim_end_matches('.'), details)
        })
    }
}

impl StyleFormatter for Vancouver {
    fn style(&self) -> CitationStyle {
        CitationStyle::Vancouver
    }

    fn format_authors(&self, authors: &[Author]) -> String {
        let rendered: Vec<String> = authors.iter().map(author_name).collect();
        NAMES.join(&rendered)
    }

    fn format_reference(&self, meta: &CitationMetadata, ordinal: Option<u32>) -> String {
        let authors = self.format_authors(&meta.authors);
        let author_block = if meta.is_edited_work {
            format!("{}, editors.", authors)
        } else {
            terminate(&authors)
        };

        let mut parts = vec![
            format!("{}.", ordinal_or_default(ordinal)),
            author_block,
            terminate(title_of(meta)),
        ];
        parts.extend(self.container_part(meta));
        if let Some(doi) = meta.doi() {
            parts.push(format!("doi: {}.", doi));
        } else if let Some(url) = meta.url() {
            parts.push(format!("Available from: {}", url));
        }
        parts.join(" ")
    }

    fn in_text_parenthetical(&self, _meta: &CitationMetadata, ordinal: Option<u32>) -> String {
        format!("({})", ordinal_or_default(ordinal))
    }

    fn in_text_narrative(&self, meta: &CitationMetadata, ordinal: Option<u32>) -> String {
        let number = self.in_text_parenthetical(meta, ordinal);
        match names::first_author_label(&meta.authors) {
            Some(label) => format!("{} {}", label, number),
            None => number,
        }
    }
}
