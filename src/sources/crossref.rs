//! CrossRef metadata source.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::{Author, CitationMetadata, ContainerType};
use crate::sources::{status_error, MetadataSource, SourceError};
use crate::utils::{api_retry_config, with_retry, HttpClient, RetryConfig};

const CROSSREF_API_BASE: &str = "https://api.crossref.org";

/// CrossRef metadata source
///
/// Uses the CrossRef REST API (`/works/{doi}`) for DOI lookup.
#[derive(Debug, Clone)]
pub struct CrossRefSource {
    client: Arc<HttpClient>,
    base_url: String,
    retry: RetryConfig,
}

impl CrossRefSource {
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self::with_client(HttpClient::new()?))
    }

    /// Use an existing client, e.g. one configured with a `mailto`
    pub fn with_client(client: HttpClient) -> Self {
        Self {
            client: Arc::new(client),
            base_url: CROSSREF_API_BASE.to_string(),
            retry: api_retry_config(),
        }
    }

    /// Point the source at another API root
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
impl MetadataSource for CrossRefSource {
    fn id(&self) -> &str {
        "crossref"
    }

    fn name(&self) -> &str {
        "CrossRef"
    }

    async fn fetch(&self, doi: &str) -> Result<CitationMetadata, SourceError> {
        let url = format!("{}/works/{}", self.base_url, urlencoding::encode(doi));
        tracing::debug!("Fetching CrossRef metadata: {}", url);

        // Clone values for retry closure
        let client = Arc::clone(&self.client);

        let response = with_retry(self.retry, || {
            let client = Arc::clone(&client);
            let url = url.clone();
            async move {
                let response = client.get(&url).send().await.map_err(|e| {
                    SourceError::Network(format!("Failed to fetch from CrossRef: {}", e))
                })?;

                if !response.status().is_success() {
                    return Err(status_error("CrossRef", doi, response.status()));
                }

                Ok(response)
            }
        })
        .await?;

        let data: CRResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to parse JSON: {}", e)))?;

        Ok(data.message.into_metadata(doi))
    }
}

/// Container type for a CrossRef work `type`; the flag marks edited volumes
fn container_type(work_type: &str) -> (ContainerType, bool) {
    match work_type {
        "journal-article" => (ContainerType::Journal, false),
        "edited-book" => (ContainerType::Book, true),
        "monograph" => (ContainerType::Book, false),
        t if t.starts_with("book") => (ContainerType::Book, false),
        "proceedings-article" => (ContainerType::Conference, false),
        "posted-content" => (ContainerType::Preprint, false),
        _ => (ContainerType::Other, false),
    }
}

// ===== CrossRef API Types =====

#[derive(Debug, Deserialize)]
struct CRResponse {
    message: CRWork,
}

#[derive(Debug, Deserialize)]
struct CRWork {
    #[serde(rename = "DOI")]
    doi: Option<String>,
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    author: Vec<CRPerson>,
    #[serde(default)]
    editor: Vec<CRPerson>,
    #[serde(rename = "container-title", default)]
    container_title: Vec<String>,
    #[serde(rename = "type")]
    work_type: Option<String>,
    volume: Option<String>,
    issue: Option<String>,
    page: Option<String>,
    publisher: Option<String>,
    #[serde(rename = "URL")]
    url: Option<String>,
    issued: Option<CRDate>,
    published: Option<CRDate>,
    #[serde(rename = "published-print")]
    published_print: Option<CRDate>,
    #[serde(rename = "published-online")]
    published_online: Option<CRDate>,
}

#[derive(Debug, Deserialize)]
struct CRPerson {
    given: Option<String>,
    family: Option<String>,
    /// Organizational contributors carry only a name
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CRDate {
    /// `[[year, month, day]]`, month and day optional; entries may be null
    #[serde(rename = "date-parts", default)]
    date_parts: Vec<Vec<serde_json::Value>>,
}

impl CRDate {
    fn year(&self) -> Option<String> {
        let year = self.date_parts.first()?.first()?;
        year.as_i64()
            .map(|y| y.to_string())
            .or_else(|| year.as_str().map(str::to_string))
    }
}

impl From<CRPerson> for Author {
    fn from(person: CRPerson) -> Self {
        Author {
            given: person.given,
            family: person.family,
            full: person.name,
        }
    }
}

impl CRWork {
    fn year(&self) -> Option<String> {
        [
            &self.issued,
            &self.published,
            &self.published_print,
            &self.published_online,
        ]
        .into_iter()
        .flatten()
        .find_map(CRDate::year)
    }

    fn into_metadata(self, requested_doi: &str) -> CitationMetadata {
        let year = self.year();
        let (container_type, mut is_edited_work) =
            container_type(self.work_type.as_deref().unwrap_or_default());

        let authors: Vec<Author> = if self.author.is_empty() && !self.editor.is_empty() {
            is_edited_work = true;
            self.editor.into_iter().map(Author::from).collect()
        } else {
            self.author.into_iter().map(Author::from).collect()
        };

        // For books the container title is a series name
        let journal = match container_type {
            ContainerType::Book => None,
            _ => self.container_title.into_iter().next(),
        };

        CitationMetadata {
            doi: self.doi.unwrap_or_else(|| requested_doi.to_string()),
            title: self.title.into_iter().next().unwrap_or_default(),
            authors,
            year,
            journal,
            volume: self.volume,
            issue: self.issue,
            pages: self.page,
            url: self.url,
            publisher: self.publisher,
            container_type,
            is_edited_work,
        }
    }
}
