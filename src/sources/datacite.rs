//! DataCite metadata source.
//!
//! DataCite registers DOIs for datasets, theses, reports and many preprints
//! that CrossRef does not know about.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::{Author, CitationMetadata, ContainerType};
use crate::sources::{status_error, MetadataSource, SourceError};
use crate::utils::{api_retry_config, with_retry, HttpClient, RetryConfig};

const DATACITE_API_BASE: &str = "https://api.datacite.org";

/// DataCite metadata source (`/dois/{doi}`)
#[derive(Debug, Clone)]
pub struct DataCiteSource {
    client: Arc<HttpClient>,
    base_url: String,
    retry: RetryConfig,
}

impl DataCiteSource {
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self::with_client(HttpClient::new()?))
    }

    pub fn with_client(client: HttpClient) -> Self {
        Self {
            client: Arc::new(client),
            base_url: DATACITE_API_BASE.to_string(),
            retry: api_retry_config(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl MetadataSource for DataCiteSource {
    fn id(&self) -> &str {
        "datacite"
    }

    fn name(&self) -> &str {
        "DataCite"
    }

    async fn fetch(&self, doi: &str) -> Result<CitationMetadata, SourceError> {
        let url = format!("{}/dois/{}", self.base_url, urlencoding::encode(doi));
        tracing::debug!("Fetching DataCite metadata: {}", url);

        let client = Arc::clone(&self.client);

        let response = with_retry(self.retry, || {
            let client = Arc::clone(&client);
            let url = url.clone();
            async move {
                let response = client
                    .get(&url)
                    .header(reqwest::header::ACCEPT, "application/vnd.api+json")
                    .send()
                    .await
                    .map_err(|e| {
                        SourceError::Network(format!("Failed to fetch from DataCite: {}", e))
                    })?;

                if !response.status().is_success() {
                    return Err(status_error("DataCite", doi, response.status()));
                }

                Ok(response)
            }
        })
        .await?;

        let body = response.text().await?;
        let data: DCResponse = serde_json::from_str(&body)?;

        Ok(data.data.attributes.into_metadata(doi))
    }
}

/// Container type for a DataCite `resourceTypeGeneral`
fn container_type(resource_type: &str) -> ContainerType {
    match resource_type {
        "JournalArticle" => ContainerType::Journal,
        "Book" => ContainerType::Book,
        "ConferencePaper" | "ConferenceProceeding" => ContainerType::Conference,
        "Preprint" => ContainerType::Preprint,
        _ => ContainerType::Other,
    }
}

// ===== DataCite API Types =====

#[derive(Debug, Deserialize)]
struct DCResponse {
    data: DCData,
}

#[derive(Debug, Deserialize)]
struct DCData {
    attributes: DCAttributes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DCAttributes {
    doi: Option<String>,
    #[serde(default)]
    titles: Vec<DCTitle>,
    #[serde(default)]
    creators: Vec<DCPerson>,
    #[serde(default)]
    contributors: Vec<DCPerson>,
    publisher: Option<DCPublisher>,
    publication_year: Option<serde_json::Value>,
    types: Option<DCTypes>,
    container: Option<DCContainer>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DCTitle {
    title: String,
    /// `Subtitle`, `AlternativeTitle`, ...; absent for the main title
    #[serde(rename = "titleType")]
    title_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DCPerson {
    name: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
    name_type: Option<String>,
    contributor_type: Option<String>,
}

/// Plain string, or `{"name": ...}` when requested with `publisher=true`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DCPublisher {
    Name(String),
    Object { name: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DCTypes {
    resource_type_general: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DCContainer {
    title: Option<String>,
    volume: Option<String>,
    issue: Option<String>,
    first_page: Option<String>,
    last_page: Option<String>,
}

impl DCPerson {
    fn into_author(self) -> Author {
        let organizational = self.name_type.as_deref() == Some("Organizational");
        if organizational || self.family_name.is_none() {
            return Author {
                given: None,
                family: None,
                full: self.name,
            };
        }
        Author {
            given: self.given_name,
            family: self.family_name,
            full: self.name,
        }
    }
}

impl DCContainer {
    fn pages(&self) -> Option<String> {
        match (self.first_page.as_deref(), self.last_page.as_deref()) {
            (Some(first), Some(last)) if first != last => Some(format!("{}-{}", first, last)),
            (Some(first), _) => Some(first.to_string()),
            (None, _) => None,
        }
    }
}

impl DCAttributes {
    fn into_metadata(self, requested_doi: &str) -> CitationMetadata {
        let container_type = self
            .types
            .as_ref()
            .and_then(|t| t.resource_type_general.as_deref())
            .map(container_type)
            .unwrap_or(ContainerType::Other);

        let title = self
            .titles
            .iter()
            .find(|t| t.title_type.is_none())
            .or_else(|| self.titles.first())
            .map(|t| t.title.clone())
            .unwrap_or_default();

        let year = self.publication_year.as_ref().and_then(|year| {
            year.as_i64()
                .map(|y| y.to_string())
                .or_else(|| year.as_str().map(str::to_string))
        });

        let mut is_edited_work = false;
        let authors: Vec<Author> = if self.creators.is_empty() {
            let editors: Vec<Author> = self
                .contributors
                .into_iter()
                .filter(|c| c.contributor_type.as_deref() == Some("Editor"))
                .map(DCPerson::into_author)
                .collect();
            is_edited_work = !editors.is_empty();
            editors
        } else {
            self.creators.into_iter().map(DCPerson::into_author).collect()
        };

        let pages = self.container.as_ref().and_then(DCContainer::pages);
        let (journal, volume, issue) = match self.container {
            Some(container) if container_type != ContainerType::Book => {
                (container.title, container.volume, container.issue)
            }
            _ => (None, None, None),
        };

        CitationMetadata {
            doi: self.doi.unwrap_or_else(|| requested_doi.to_string()),
            title,
            authors,
            year,
            journal,
            volume,
            issue,
            pages,
            url: self.url,
            publisher: self.publisher.map(|p| match p {
                DCPublisher::Name(name) | DCPublisher::Object { name } => name,
            }),
            container_type,
            is_edited_work,
        }
    }
}
