//! Integration tests for doi-cite
//!
//! These tests drive the public API end to end: detection, resolution
//! through mocked metadata services, and citation output.

use doi_cite::cite::{
    format_bibtex, format_citation, format_in_text_narrative, format_in_text_parenthetical,
    format_reference, strip_markup, CitationFormat, CitationStyle,
};
use doi_cite::config::{load_config, Config};
use doi_cite::doi::{detect_from_document, detect_from_text, normalize, HtmlDocument};
use doi_cite::models::{Author, CitationMetadata, ContainerType, DetectionSource};
use doi_cite::sources::{CrossRefSource, MetadataResolver, MetadataSource, MockSource, SourceError};
use doi_cite::utils::{MemoryStore, RetryConfig};
use std::sync::Arc;
use std::time::Duration;

const WORK: &str = r#"{
    "status": "ok",
    "message": {
        "DOI": "10.1038/nphys1170",
        "type": "journal-article",
        "title": ["Measured measurement"],
        "author": [{"given": "Markus", "family": "Aspelmeyer"}],
        "container-title": ["Nature Physics"],
        "volume": "5",
        "issue": "1",
        "page": "11-12",
        "issued": {"date-parts": [[2009, 1]]}
    }
}"#;

fn article() -> CitationMetadata {
    CitationMetadata::builder("10.1038/nphys1170", "Measured measurement")
        .author(Author::new("Markus", "Aspelmeyer"))
        .author(Author::new("Anton", "Zeilinger"))
        .journal("Nature Physics")
        .volume("5")
        .issue("1")
        .pages("11-12")
        .year("2009")
        .build()
}

fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 2,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        ..Default::default()
    }
}

#[test]
fn test_detected_dois_are_normalized() {
    let text = "Published as https://doi.org/10.1038/NPHYS1170 (see also doi:10.1016/j.cell.2020.01.001).";
    let dois = detect_from_text(text);
    assert_eq!(dois.len(), 2);
    for doi in &dois {
        assert_eq!(normalize(doi).as_deref(), Some(doi.as_str()));
    }
    assert_eq!(dois[1], "10.1016/j.cell.2020.01.001");
}

#[test]
fn test_html_document_detection() {
    let page = HtmlDocument::parse(
        r#"<html><head><meta name="citation_doi" content="doi:10.1038/nphys1170"></head>
        <body><p>Related: 10.1016/j.cell.2020.01.001</p></body></html>"#,
    );
    let result = detect_from_document(&page);
    assert_eq!(result.source, DetectionSource::MetaTag);
    assert_eq!(result.first(), Some("10.1038/nphys1170"));
}

#[test]
fn test_every_format_mentions_the_doi() {
    let meta = article();
    for style in CitationStyle::ALL {
        let reference = format_reference(&meta, style, Some(1));
        assert!(
            reference.contains("10.1038/nphys1170"),
            "{} reference lacks the DOI: {}",
            style,
            reference
        );
        assert!(!format_in_text_parenthetical(&meta, style, Some(1)).is_empty());
        assert!(!format_in_text_narrative(&meta, style, Some(1)).is_empty());
    }

    let bibtex = format_citation(&meta, CitationFormat::Bibtex, None);
    assert_eq!(bibtex, format_bibtex(&meta));
    assert!(bibtex.starts_with("@article{aspelmeyer_2009,"));
    assert!(bibtex.contains("doi = {10.1038/nphys1170}"));
}

#[test]
fn test_in_text_forms() {
    let meta = article();
    assert_eq!(
        format_in_text_parenthetical(&meta, CitationStyle::Apa, None),
        "(Aspelmeyer & Zeilinger, 2009)"
    );
    assert_eq!(
        format_in_text_narrative(&meta, CitationStyle::Apa, None),
        "Aspelmeyer and Zeilinger (2009)"
    );
    assert_eq!(
        format_in_text_parenthetical(&meta, CitationStyle::Ieee, Some(3)),
        "[3]"
    );
}

#[test]
fn test_metadata_json_round_trip_formats_identically() {
    let meta = article();
    let json = serde_json::to_string(&meta).unwrap();
    let parsed: CitationMetadata = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, meta);
    assert_eq!(parsed.container_type, ContainerType::default());
}

#[tokio::test]
async fn test_resolve_and_cite_via_crossref() {
    let mut server = mockito::Server::new_async().await;
    let work = server
        .mock("GET", "/works/10.1038%2Fnphys1170")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(WORK)
        .expect(1)
        .create_async()
        .await;

    let crossref = CrossRefSource::new()
        .unwrap()
        .with_base_url(server.url())
        .with_retry_config(fast_retry());
    let resolver = MetadataResolver::new()
        .with_source(Arc::new(crossref))
        .with_cache(Arc::new(MemoryStore::new()), Duration::from_secs(60));

    let meta = resolver
        .resolve("https://doi.org/10.1038/nphys1170")
        .await
        .unwrap();
    let apa = strip_markup(&format_reference(&meta, CitationStyle::Apa, None));
    assert!(apa.starts_with("Aspelmeyer, M. (2009). Measured measurement."));
    assert!(apa.contains("Nature Physics, 5(1), 11-12."));
    assert!(apa.ends_with("https://doi.org/10.1038/nphys1170"));

    // Second lookup is served from the cache
    resolver.resolve("doi:10.1038/NPHYS1170").await.unwrap();
    work.assert_async().await;
}

#[tokio::test]
async fn test_resolver_falls_back_between_sources() {
    let mut server = mockito::Server::new_async().await;
    let _missing = server
        .mock("GET", "/works/10.1038%2Fnphys1170")
        .with_status(404)
        .create_async()
        .await;

    let crossref = CrossRefSource::new()
        .unwrap()
        .with_base_url(server.url())
        .with_retry_config(fast_retry());
    let fallback = Arc::new(MockSource::new("fallback").with_record(article()));
    let resolver = MetadataResolver::new()
        .with_source(Arc::new(crossref))
        .with_source(fallback.clone());

    let meta = resolver.resolve("10.1038/nphys1170").await.unwrap();
    assert_eq!(meta.authors.len(), 2);
    assert_eq!(fallback.calls(), 1);
    assert_eq!(resolver.source_ids(), vec!["crossref", "fallback"]);
}

#[test]
fn test_mock_source_outside_a_runtime() {
    let source = MockSource::new("mock").with_record(article());
    let meta = tokio_test::block_on(source.fetch("10.1038/NPHYS1170")).unwrap();
    assert_eq!(meta.title, "Measured measurement");

    let missing = tokio_test::block_on(source.fetch("10.1000/none"));
    assert!(matches!(missing, Err(SourceError::NotFound(_))));
}

#[test]
fn test_config_file_drives_resolver() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doi-cite.toml");
    std::fs::write(
        &path,
        "[citation]\ndefault_format = \"vancouver\"\n\n[cache]\nenabled = false\n\n[sources]\norder = [\"crossref\"]\n",
    )
    .unwrap();

    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.citation.default_format, CitationFormat::Vancouver);
    assert!(!config.cache.enabled);

    let resolver = MetadataResolver::from_config(&config).unwrap();
    if cfg!(feature = "source-crossref") {
        assert_eq!(resolver.source_ids(), vec!["crossref"]);
    }

    let saved = dir.path().join("saved.toml");
    config.save(&saved).unwrap();
    assert_eq!(Config::from_toml_file(&saved).unwrap(), config);
}
