//! Author-name rendering shared by the style formatters.

use crate::models::Author;

/// Rendered in place of an empty author list
pub const NO_AUTHOR: &str = "[No author]";

/// Rendered in a reference list for an author with no usable name
pub const UNKNOWN_AUTHOR: &str = "[Unknown]";

/// Rendered in running text for an author with no usable name
pub const UNKNOWN_IN_TEXT: &str = "Unknown";

/// How given names collapse into initials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initials {
    /// `J. P.`, hyphenated names keep the hyphen (`J.-L.`)
    Spaced,
    /// `JP`
    Compact,
}

/// Collapse given names into initials
pub fn initials(given: &str, form: Initials) -> String {
    let words = given.split_whitespace().filter_map(|word| {
        let parts: Vec<char> = word
            .split('-')
            .filter_map(|part| part.chars().find(|c| c.is_alphabetic()))
            .flat_map(char::to_uppercase)
            .collect();
        (!parts.is_empty()).then_some(parts)
    });

    match form {
        Initials::Spaced => words
            .map(|parts| {
                parts
                    .iter()
                    .map(|c| format!("{}.", c))
                    .collect::<Vec<_>>()
                    .join("-")
            })
            .collect::<Vec<_>>()
            .join(" "),
        Initials::Compact => words.flatten().collect(),
    }
}

/// Render an author through `render(family, given)`, falling back to the
/// literal name and then to [`UNKNOWN_AUTHOR`]
pub fn render_name<F>(author: &Author, render: F) -> String
where
    F: FnOnce(&str, Option<&str>) -> String,
{
    match (author.family_name(), author.full_name()) {
        (Some(family), _) => render(family, author.given_name()),
        (None, Some(full)) => full.to_string(),
        (None, None) => UNKNOWN_AUTHOR.to_string(),
    }
}

/// `Family, Given`
pub fn inverted(author: &Author) -> String {
    render_name(author, |family, given| match given {
        Some(given) => format!("{}, {}", family, given),
        None => family.to_string(),
    })
}

/// `Given Family`
pub fn natural(author: &Author) -> String {
    render_name(author, |family, given| match given {
        Some(given) => format!("{} {}", given, family),
        None => family.to_string(),
    })
}

/// Surname used in running text
pub fn in_text_name(author: &Author) -> &str {
    author.sort_name().unwrap_or(UNKNOWN_IN_TEXT)
}

/// What replaces the names dropped from a long list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truncation {
    /// The first `keep` names, then `marker`
    EtAl { keep: usize, marker: &'static str },
    /// The first `keep` names, then `marker` and the final name
    Ellipsis { keep: usize, marker: &'static str },
}

/// Joining and truncation rule for a reference-list author block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameList {
    /// Longest list rendered without truncation
    pub max_names: usize,
    /// Between exactly two names
    pub pair: &'static str,
    /// Between names of a longer list
    pub separator: &'static str,
    /// Before the final name of a longer list
    pub last: &'static str,
    pub truncation: Truncation,
}

impl NameList {
    /// Join already-rendered names
    pub fn join(&self, names: &[String]) -> String {
        match names.len() {
            0 => NO_AUTHOR.to_string(),
            1 => names[0].clone(),
            n if n > self.max_names => self.truncate(names),
            2 => format!("{}{}{}", names[0], self.pair, names[1]),
            n => format!(
                "{}{}{}",
                names[..n - 1].join(self.separator),
                self.last,
                names[n - 1]
            ),
        }
    }

    fn truncate(&self, names: &[String]) -> String {
        match self.truncation {
            Truncation::EtAl { keep, marker } => {
                let keep = keep.min(names.len());
                format!("{}{}", names[..keep].join(self.separator), marker)
            }
            Truncation::Ellipsis { keep, marker } => {
                let keep = keep.min(names.len() - 1);
                format!(
                    "{}{}{}",
                    names[..keep].join(self.separator),
                    marker,
                    names[names.len() - 1]
                )
            }
        }
    }
}

/// Singular and plural editor labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorLabel {
    pub singular: &'static str,
    pub plural: &'static str,
}

impl EditorLabel {
    /// Label agreeing with the number of contributors
    pub fn for_count(&self, count: usize) -> &'static str {
        if count > 1 {
            self.plural
        } else {
            self.singular
        }
    }
}

/// Short author label for author-date and author-only citations:
/// one name, two names joined by `conjunction`, or `First et al.`
pub fn short_author_label(authors: &[Author], conjunction: &str) -> String {
    match authors {
        [] => NO_AUTHOR.to_string(),
        [only] => in_text_name(only).to_string(),
        [first, second] => format!(
            "{} {} {}",
            in_text_name(first),
            conjunction,
            in_text_name(second)
        ),
        [first, ..] => format!("{} et al.", in_text_name(first)),
    }
}

/// Narrative prefix for numbered citations; `None` without authors
pub fn first_author_label(authors: &[Author]) -> Option<String> {
    match authors {
        [] => None,
        [only] => Some(in_text_name(only).to_string()),
        [first, ..] => Some(format!("{} et al.", in_text_name(first))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("A{}", i)).collect()
    }

    const RULE: NameList = NameList {
        max_names: 3,
        pair: " & ",
        separator: ", ",
        last: ", & ",
        truncation: Truncation::EtAl {
            keep: 2,
            marker: ", et al",
        },
    };

    #[test]
    fn test_initials() {
        assert_eq!(initials("John Paul", Initials::Spaced), "J. P.");
        assert_eq!(initials("John Paul", Initials::Compact), "JP");
        assert_eq!(initials("jean-luc", Initials::Spaced), "J.-L.");
        assert_eq!(initials("Jean-Luc", Initials::Compact), "JL");
        assert_eq!(initials("J. R. R.", Initials::Spaced), "J. R. R.");
        assert_eq!(initials("  ", Initials::Spaced), "");
    }

    #[test]
    fn test_name_fallbacks() {
        assert_eq!(inverted(&Author::new("Jane", "Doe")), "Doe, Jane");
        assert_eq!(natural(&Author::new("Jane", "Doe")), "Jane Doe");
        assert_eq!(inverted(&Author::literal("World Health Organization")), "World Health Organization");
        assert_eq!(inverted(&Author::default()), UNKNOWN_AUTHOR);

        let family_only = Author {
            family: Some("Plato".to_string()),
            ..Default::default()
        };
        assert_eq!(natural(&family_only), "Plato");
        assert_eq!(in_text_name(&Author::default()), UNKNOWN_IN_TEXT);
    }

    #[test]
    fn test_name_list_join() {
        assert_eq!(RULE.join(&[]), NO_AUTHOR);
        assert_eq!(RULE.join(&names(1)), "A1");
        assert_eq!(RULE.join(&names(2)), "A1 & A2");
        assert_eq!(RULE.join(&names(3)), "A1, A2, & A3");
        assert_eq!(RULE.join(&names(4)), "A1, A2, et al");
    }

    #[test]
    fn test_name_list_ellipsis() {
        let rule = NameList {
            truncation: Truncation::Ellipsis {
                keep: 2,
                marker: ", ... ",
            },
            ..RULE
        };
        assert_eq!(rule.join(&names(5)), "A1, A2, ... A5");
    }

    #[test]
    fn test_editor_label() {
        let label = EditorLabel {
            singular: "ed",
            plural: "eds",
        };
        assert_eq!(label.for_count(1), "ed");
        assert_eq!(label.for_count(3), "eds");
    }

    #[test]
    fn test_short_labels() {
        let doe = Author::new("Jane", "Doe");
        let smith = Author::new("John", "Smith");
        let roe = Author::new("Richard", "Roe");

        assert_eq!(short_author_label(&[doe.clone()], "&"), "Doe");
        assert_eq!(short_author_label(&[doe.clone(), smith.clone()], "&"), "Doe & Smith");
        assert_eq!(
            short_author_label(&[doe.clone(), smith.clone(), roe], "and"),
            "Doe et al."
        );

        assert_eq!(first_author_label(&[]), None);
        assert_eq!(first_author_label(&[doe.clone()]).as_deref(), Some("Doe"));
        assert_eq!(first_author_label(&[doe, smith]).as_deref(), Some("Doe et al."));
    }
}
