//! Normalized citation metadata shared by every formatter.

use serde::{Deserialize, Deserializer, Serialize};

/// Kind of work the metadata describes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerType {
    #[default]
    Journal,
    Book,
    Conference,
    Preprint,
    #[serde(other)]
    Other,
}

impl ContainerType {
    /// Returns the identifier used in configuration and JSON
    pub fn id(&self) -> &'static str {
        match self {
            ContainerType::Journal => "journal",
            ContainerType::Book => "book",
            ContainerType::Conference => "conference",
            ContainerType::Preprint => "preprint",
            ContainerType::Other => "other",
        }
    }
}

impl std::fmt::Display for ContainerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A single contributor as supplied by the metadata source
///
/// Upstream data usually fills at least one field. Formatters fall back from
/// `family` to `full`, and to a marker label when all three are missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    /// Literal name, used for organizations and unparsed names
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "literal", alias = "name")]
    pub full: Option<String>,
}

impl Author {
    /// Create an author from given and family names
    pub fn new(given: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            given: Some(given.into()),
            family: Some(family.into()),
            full: None,
        }
    }

    /// Create an author known only by a literal name
    pub fn literal(full: impl Into<String>) -> Self {
        Self {
            given: None,
            family: None,
            full: Some(full.into()),
        }
    }

    /// Family name, if present and not blank
    pub fn family_name(&self) -> Option<&str> {
        non_blank(self.family.as_deref())
    }

    /// Given name, if present and not blank
    pub fn given_name(&self) -> Option<&str> {
        non_blank(self.given.as_deref())
    }

    /// Literal name, if present and not blank
    pub fn full_name(&self) -> Option<&str> {
        non_blank(self.full.as_deref())
    }

    /// Family name, falling back to the literal name
    pub fn sort_name(&self) -> Option<&str> {
        self.family_name().or_else(|| self.full_name())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Canonical, style-agnostic record consumed by every formatter
///
/// Formatters take it by shared reference and never mutate it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationMetadata {
    /// Digital Object Identifier
    pub doi: String,

    /// Work title
    pub title: String,

    /// Contributors in citation order
    #[serde(default)]
    pub authors: Vec<Author>,

    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,

    /// Journal, proceedings or series name
    #[serde(default, alias = "containerTitle", skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,

    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,

    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,

    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    #[serde(default)]
    pub container_type: ContainerType,

    /// The contributors are editors rather than authors
    #[serde(default)]
    pub is_edited_work: bool,
}

impl CitationMetadata {
    /// Start building a record from the two required fields
    pub fn builder(doi: impl Into<String>, title: impl Into<String>) -> CitationMetadataBuilder {
        CitationMetadataBuilder::new(doi, title)
    }

    /// DOI, if present and not blank
    pub fn doi(&self) -> Option<&str> {
        non_blank(Some(self.doi.as_str()))
    }

    /// Title, if present and not blank
    pub fn title(&self) -> Option<&str> {
        non_blank(Some(self.title.as_str()))
    }

    pub fn year(&self) -> Option<&str> {
        non_blank(self.year.as_deref())
    }

    pub fn journal(&self) -> Option<&str> {
        non_blank(self.journal.as_deref())
    }

    pub fn volume(&self) -> Option<&str> {
        non_blank(self.volume.as_deref())
    }

    pub fn issue(&self) -> Option<&str> {
        non_blank(self.issue.as_deref())
    }

    pub fn pages(&self) -> Option<&str> {
        non_blank(self.pages.as_deref())
    }

    pub fn url(&self) -> Option<&str> {
        non_blank(self.url.as_deref())
    }

    pub fn publisher(&self) -> Option<&str> {
        non_blank(self.publisher.as_deref())
    }

    /// Whether the title should be rendered as a standalone work
    pub fn is_book(&self) -> bool {
        self.container_type == ContainerType::Book
    }
}

/// Builder for constructing CitationMetadata records
#[derive(Debug, Clone)]
pub struct CitationMetadataBuilder {
    metadata: CitationMetadata,
}

impl CitationMetadataBuilder {
    /// Create a new builder with required fields
    pub fn new(doi: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            metadata: CitationMetadata {
                doi: doi.into(),
                title: title.into(),
                ..Default::default()
            },
        }
    }

    /// Append an author
    pub fn author(mut self, author: Author) -> Self {
        self.metadata.authors.push(author);
        self
    }

    /// Replace the author list
    pub fn authors(mut self, authors: impl IntoIterator<Item = Author>) -> Self {
        self.metadata.authors = authors.into_iter().collect();
        self
    }

    pub fn year(mut self, year: impl Into<String>) -> Self {
        self.metadata.year = Some(year.into());
        self
    }

    pub fn journal(mut self, journal: impl Into<String>) -> Self {
        self.metadata.journal = Some(journal.into());
        self
    }

    pub fn volume(mut self, volume: impl Into<String>) -> Self {
        self.metadata.volume = Some(volume.into());
        self
    }

    pub fn issue(mut self, issue: impl Into<String>) -> Self {
        self.metadata.issue = Some(issue.into());
        self
    }

    pub fn pages(mut self, pages: impl Into<String>) -> Self {
        self.metadata.pages = Some(pages.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.metadata.url = Some(url.into());
        self
    }

    pub fn publisher(mut self, publisher: impl Into<String>) -> Self {
        self.metadata.publisher = Some(publisher.into());
        self
    }

    pub fn container_type(mut self, container_type: ContainerType) -> Self {
        self.metadata.container_type = container_type;
        self
    }

    /// Mark the contributors as editors
    pub fn edited(mut self, edited: bool) -> Self {
        self.metadata.is_edited_work = edited;
        self
    }

    /// Build the record
    pub fn build(self) -> CitationMetadata {
        self.metadata
    }
}

/// Accept `"590"`, `590` or `null` for fields that upstream APIs send as either
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        Some(_) => None,
    })
}
