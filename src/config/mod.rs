//! Configuration management.
//!
//! Settings come from an optional TOML file and `DOI_CITE_*` environment
//! variables (nested keys use `__`, e.g. `DOI_CITE_CACHE__ENABLED=false`).
//!
//! ```toml
//! [citation]
//! default_format = "vancouver"
//! plain_text = false
//!
//! [cache]
//! enabled = true
//! directory = "~/.cache/doi-cite"
//! metadata_ttl_seconds = 86400
//!
//! [http]
//! timeout_seconds = 30
//! mailto = "you@example.org"
//!
//! [sources]
//! order = ["crossref", "datacite"]
//! ```

mod file_config;

pub use file_config::ConfigFileError;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cite::CitationFormat;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "doi-cite.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub citation: CitationConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub sources: SourcesConfig,
}

/// Output defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CitationConfig {
    /// Style or BibTeX used when none is given on the command line
    #[serde(default)]
    pub default_format: CitationFormat,

    /// Strip `<em>` markup from formatted output
    #[serde(default)]
    pub plain_text: bool,
}

/// Metadata cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Cache root; defaults to the platform cache directory
    #[serde(default)]
    pub directory: Option<PathBuf>,

    #[serde(default = "default_metadata_ttl")]
    pub metadata_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: None,
            metadata_ttl_seconds: default_metadata_ttl(),
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Contact address sent to CrossRef's polite pool
    #[serde(default)]
    pub mailto: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            mailto: None,
        }
    }
}

/// Metadata source selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Source ids, tried in order until one knows the DOI
    #[serde(default = "default_source_order")]
    pub order: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            order: default_source_order(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_metadata_ttl() -> u64 {
    86_400 // 24 hours
}

fn default_timeout() -> u64 {
    30
}

fn default_source_order() -> Vec<String> {
    vec!["crossref".to_string(), "datacite".to_string()]
}

/// Default cache root
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("doi-cite")
}

/// Look for a configuration file in the working directory, then the user
/// configuration directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("doi-cite").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Load configuration from an optional file plus environment overrides
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    builder
        .add_source(environment())
        .build()?
        .try_deserialize()
}

/// `DOI_CITE_*` overrides; `DOI_CITE_SOURCES__ORDER` is a comma-separated list
fn environment() -> config::Environment {
    config::Environment::with_prefix("DOI_CITE")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("sources.order")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.cache.enabled);
        assert_eq!(config.cache.metadata_ttl_seconds, 86_400);
        assert_eq!(config.http.timeout_seconds, 30);
        assert_eq!(config.sources.order, vec!["crossref", "datacite"]);
        assert_eq!(config.citation.default_format, CitationFormat::Apa);
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doi-cite.toml");
        std::fs::write(
            &path,
            r#"
[citation]
default_format = "ieee"
plain_text = true

[cache]
enabled = false
metadata_ttl_seconds = 60

[sources]
order = ["datacite"]
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.citation.default_format, CitationFormat::Ieee);
        assert!(config.citation.plain_text);
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.metadata_ttl_seconds, 60);
        assert_eq!(config.sources.order, vec!["datacite"]);
        assert_eq!(config.http.timeout_seconds, 30);
    }

    #[test]
    fn test_environment_overrides() {
        let vars: config::Map<String, String> = [
            ("DOI_CITE_SOURCES__ORDER", "datacite,crossref"),
            ("DOI_CITE_CACHE__ENABLED", "false"),
            ("DOI_CITE_HTTP__MAILTO", "lab@example.org"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config: Config = config::Config::builder()
            .add_source(environment().source(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.sources.order, vec!["datacite", "crossref"]);
        assert!(!config.cache.enabled);
        assert_eq!(config.http.mailto.as_deref(), Some("lab@example.org"));
        assert_eq!(config.citation.default_format, CitationFormat::Apa);
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config(Some(Path::new("/nonexistent/doi-cite.toml"))).is_err());
    }
}
