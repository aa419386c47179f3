//! Citation formatting.
//!
//! Five reference styles share one [`StyleFormatter`] contract and are
//! selected through [`CitationStyle`]. [`CitationFormat`] adds BibTeX on top
//! of the styles for callers that pick an output format from configuration.
//!
//! Formatted strings may contain `<em>...</em>` for italics; use
//! [`strip_markup`] for plain-text output.
//!
//! ```
//! use doi_cite::cite::{format_reference, CitationStyle};
//! use doi_cite::models::{Author, CitationMetadata};
//!
//! let meta = CitationMetadata::builder("10.1038/nphys1170", "Measured measurement")
//!     .author(Author::new("Markus", "Aspelmeyer"))
//!     .journal("Nature Physics")
//!     .year("2009")
//!     .build();
//!
//! let reference = format_reference(&meta, CitationStyle::Vancouver, Some(1));
//! assert!(reference.starts_with("1. Aspelmeyer M."));
//! ```

mod apa;
mod bibtex;
pub mod casing;
mod chicago;
mod ieee;
mod mla;
pub mod names;
mod vancouver;

pub use apa::Apa;
pub use bibtex::{citation_key, escape_bibtex, format_bibtex};
pub use chicago::Chicago;
pub use ieee::Ieee;
pub use mla::Mla;
pub use vancouver::Vancouver;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{Author, CitationMetadata};

/// Rendered in place of a missing title
pub const NO_TITLE: &str = "[No title]";

/// Shared contract of the reference styles
pub trait StyleFormatter: Send + Sync {
    /// Style implemented by this formatter
    fn style(&self) -> CitationStyle;

    /// Author block for a reference-list entry, without trailing punctuation
    fn format_authors(&self, authors: &[Author]) -> String;

    /// Full reference-list entry; numbered styles default to ordinal 1
    fn format_reference(&self, meta: &CitationMetadata, ordinal: Option<u32>) -> String;

    /// Parenthetical in-text citation, e.g. `(Doe, 2021)` or `[1]`
    fn in_text_parenthetical(&self, meta: &CitationMetadata, ordinal: Option<u32>) -> String;

    /// Narrative in-text citation, e.g. `Doe (2021)` or `Doe [1]`
    fn in_text_narrative(&self, meta: &CitationMetadata, ordinal: Option<u32>) -> String;
}

/// Reference style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationStyle {
    /// APA 7th edition
    Apa,
    /// MLA 9th edition
    Mla,
    /// Chicago notes-bibliography, numbered in-text
    Chicago,
    /// IEEE
    Ieee,
    /// Vancouver (ICMJE)
    Vancouver,
}

impl CitationStyle {
    pub const ALL: [CitationStyle; 5] = [
        CitationStyle::Apa,
        CitationStyle::Mla,
        CitationStyle::Chicago,
        CitationStyle::Ieee,
        CitationStyle::Vancouver,
    ];

    /// Lowercase identifier used in configuration and on the command line
    pub fn id(&self) -> &'static str {
        match self {
            CitationStyle::Apa => "apa",
            CitationStyle::Mla => "mla",
            CitationStyle::Chicago => "chicago",
            CitationStyle::Ieee => "ieee",
            CitationStyle::Vancouver => "vancouver",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            CitationStyle::Apa => "APA 7th edition",
            CitationStyle::Mla => "MLA 9th edition",
            CitationStyle::Chicago => "Chicago",
            CitationStyle::Ieee => "IEEE",
            CitationStyle::Vancouver => "Vancouver",
        }
    }

    /// Whether in-text citations refer to a reference number
    pub fn is_numbered(&self) -> bool {
        matches!(
            self,
            CitationStyle::Chicago | CitationStyle::Ieee | CitationStyle::Vancouver
        )
    }

    pub fn formatter(&self) -> &'static dyn StyleFormatter {
        match self {
            CitationStyle::Apa => &Apa,
            CitationStyle::Mla => &Mla,
            CitationStyle::Chicago => &Chicago,
            CitationStyle::Ieee => &Ieee,
            CitationStyle::Vancouver => &Vancouver,
        }
    }
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Error for unrecognized style or format names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown citation format: {0}")]
pub struct UnknownFormat(pub String);

impl FromStr for CitationStyle {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "apa" => Ok(CitationStyle::Apa),
            "mla" => Ok(CitationStyle::Mla),
            "chicago" => Ok(CitationStyle::Chicago),
            "ieee" => Ok(CitationStyle::Ieee),
            "vancouver" => Ok(CitationStyle::Vancouver),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// Output format: a reference style or a BibTeX entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationFormat {
    #[default]
    Apa,
    Mla,
    Chicago,
    Ieee,
    Vancouver,
    Bibtex,
}

impl CitationFormat {
    /// The reference style, or `None` for BibTeX
    pub fn style(&self) -> Option<CitationStyle> {
        match self {
            CitationFormat::Apa => Some(CitationStyle::Apa),
            CitationFormat::Mla => Some(CitationStyle::Mla),
            CitationFormat::Chicago => Some(CitationStyle::Chicago),
            CitationFormat::Ieee => Some(CitationStyle::Ieee),
            CitationFormat::Vancouver => Some(CitationStyle::Vancouver),
            CitationFormat::Bibtex => None,
        }
    }
}

impl From<CitationStyle> for CitationFormat {
    fn from(style: CitationStyle) -> Self {
        match style {
            CitationStyle::Apa => CitationFormat::Apa,
            CitationStyle::Mla => CitationFormat::Mla,
            CitationStyle::Chicago => CitationFormat::Chicago,
            CitationStyle::Ieee => CitationFormat::Ieee,
            CitationStyle::Vancouver => CitationFormat::Vancouver,
        }
    }
}

impl FromStr for CitationFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bibtex" | "bib" => Ok(CitationFormat::Bibtex),
            _ => s.parse::<CitationStyle>().map(CitationFormat::from),
        }
    }
}

impl fmt::Display for CitationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style() {
            Some(style) => write!(f, "{}", style),
            None => write!(f, "bibtex"),
        }
    }
}

/// Full reference-list entry in `style`
pub fn format_reference(
    meta: &CitationMetadata,
    style: CitationStyle,
    ordinal: Option<u32>,
) -> String {
    style.formatter().format_reference(meta, ordinal)
}

/// Parenthetical in-text citation in `style`
pub fn format_in_text_parenthetical(
    meta: &CitationMetadata,
    style: CitationStyle,
    ordinal: Option<u32>,
) -> String {
    style.formatter().in_text_parenthetical(meta, ordinal)
}

/// Narrative in-text citation in `style`
pub fn format_in_text_narrative(
    meta: &CitationMetadata,
    style: CitationStyle,
    ordinal: Option<u32>,
) -> String {
    style.formatter().in_text_narrative(meta, ordinal)
}

/// Reference entry or BibTeX record, depending on `format`
pub fn format_citation(
    meta: &CitationMetadata,
    format: CitationFormat,
    ordinal: Option<u32>,
) -> String {
    match format.style() {
        Some(style) => format_reference(meta, style, ordinal),
        None => format_bibtex(meta),
    }
}

/// Remove `<em>` italics markup
pub fn strip_markup(formatted: &str) -> String {
    formatted.replace("<em>", "").replace("</em>", "")
}

/// Append a period unless the text already ends a sentence
pub(crate) fn terminate(text: &str) -> String {
    if ends_sentence(text) {
        text.to_string()
    } else {
        format!("{}.", text)
    }
}

/// `<em>text</em>.`, keeping terminal punctuation inside the markup
pub(crate) fn italic_terminated(text: &str) -> String {
    if ends_sentence(text) {
        format!("<em>{}</em>", text)
    } else {
        format!("<em>{}</em>.", text)
    }
}

/// `"text<punct>"`, unless the text already ends a sentence
pub(crate) fn quoted(text: &str, punct: char) -> String {
    if ends_sentence(text) {
        format!("\"{}\"", text)
    } else {
        format!("\"{}{}\"", text, punct)
    }
}

fn ends_sentence(text: &str) -> bool {
    text.ends_with(['.', '?', '!'])
}

pub(crate) fn title_of(meta: &CitationMetadata) -> &str {
    meta.title().unwrap_or(NO_TITLE)
}

pub(crate) fn ordinal_or_default(ordinal: Option<u32>) -> u32 {
    ordinal.unwrap_or(1)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_style_parse() {
        assert_eq!("APA".parse::<CitationStyle>(), Ok(CitationStyle::Apa));
        assert_eq!(" ieee ".parse::<CitationStyle>(), Ok(CitationStyle::Ieee));
        assert!("harvard".parse::<CitationStyle>().is_err());
        assert_eq!("bib".parse::<CitationFormat>(), Ok(CitationFormat::Bibtex));
        assert_eq!("vancouver".parse::<CitationFormat>(), Ok(CitationFormat::Vancouver));
    }

    #[test]
    fn test_formatter_dispatch() {
        for style in CitationStyle::ALL {
            assert_eq!(style.formatter().style(), style);
            assert_eq!(CitationFormat::from(style).style(), Some(style));
        }
        assert_eq!(CitationFormat::Bibtex.style(), None);
        assert_eq!(CitationFormat::default(), CitationFormat::Apa);
    }

    #[test]
    fn test_every_style_contains_doi() {
        let meta = article();
        for style in CitationStyle::ALL {
            let reference = format_reference(&meta, style, Some(1));
            assert!(
                reference.contains(&format!("https://doi.org/{}", DOI))
                    || reference.contains(&format!("doi: {}", DOI)),
                "{} reference lacks DOI: {}",
                style,
                reference
            );
        }
    }

    #[test]
    fn test_format_citation_bibtex() {
        let bib = format_citation(&article(), CitationFormat::Bibtex, None);
        assert!(bib.starts_with("@article{doe_2021,"));
    }

    #[test]
    fn test_strip_markup() {
        let apa = format_reference(&article(), CitationStyle::Apa, None);
        assert_eq!(
            strip_markup(&apa),
            "Doe, J. (2021). A study. Nature, 590, 123-130. https://doi.org/10.1038/s41586-021-00001-0"
        );
    }

    #[test]
    fn test_punctuation_helpers() {
        assert_eq!(terminate("Doe, J."), "Doe, J.");
        assert_eq!(terminate("Doe, Jane"), "Doe, Jane.");
        assert_eq!(italic_terminated("Why?"), "<em>Why?</em>");
        assert_eq!(italic_terminated("Handbook"), "<em>Handbook</em>.");
        assert_eq!(quoted("A study", ','), "\"A study,\"");
        assert_eq!(quoted("Really?", ','), "\"Really?\"");
    }

    #[test]
    fn test_missing_title_and_authors() {
        let meta = CitationMetadata::default();
        for style in CitationStyle::ALL {
            let reference = format_reference(&meta, style, None);
            assert!(reference.contains(names::NO_AUTHOR), "{}", reference);
            assert!(reference.contains(NO_TITLE), "{}", reference);
        }
    }
}
