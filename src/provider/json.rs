//! JSON file catalogue source.
//!
//! Reads the static catalogue file, shaped as
//! `{ "publications": [ ... ], "lastUpdated": "..." }`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use super::{CatalogueSource, ProviderError, ProviderResult};
use crate::models::{CatalogueData, PublicationRecord};

/// Raw payload; `publications` is optional here so its absence can be
/// reported as its own error instead of a generic parse failure.
#[derive(Debug, Deserialize)]
struct RawCatalogue {
    publications: Option<Vec<PublicationRecord>>,
    #[serde(rename = "lastUpdated")]
    last_updated: Option<String>,
}

/// Parse a catalogue JSON document.
///
/// `origin` names the document in error messages.
///
/// # Errors
/// - `ProviderError::ParseError` if the text is not valid catalogue JSON
/// - `ProviderError::MissingPublications` if there is no `publications` list
pub fn parse_catalogue(json: &str, origin: &str) -> ProviderResult<CatalogueData> {
    let raw: RawCatalogue = serde_json::from_str(json)
        .map_err(|e| ProviderError::ParseError(format!("{}: {}", origin, e)))?;

    let publications = raw
        .publications
        .ok_or_else(|| ProviderError::MissingPublications(origin.to_string()))?;

    Ok(CatalogueData {
        publications,
        last_updated: raw.last_updated,
    })
}

/// Catalogue source backed by a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    name: String,
}

impl JsonFileSource {
    /// Create a source for the given file. Nothing is read until [`load`].
    ///
    /// [`load`]: CatalogueSource::load
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = format!("json:{}", path.display());
        Self { path, name }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogueSource for JsonFileSource {
    async fn load(&self) -> ProviderResult<CatalogueData> {
        debug!("Reading catalogue from {}", self.path.display());
        let text = tokio::fs::read_to_string(&self.path).await?;
        let data = parse_catalogue(&text, &self.path.display().to_string())?;
        info!(
            publications = data.publications.len(),
            "Loaded catalogue from {}",
            self.path.display()
        );
        Ok(data)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "lastUpdated": "2024-05-01T12:00:00Z",
        "publications": [
            {
                "title": "Adaptive Congestion Control",
                "authors": ["Ada Lovelace", "Alan Turing"],
                "abstract": "Improving network throughput with adaptive congestion control.",
                "research_areas": ["Networking"],
                "publication_date": "2024-03-01",
                "url": "https://example.org/acc"
            },
            {
                "title": "Sourdough",
                "authors": ["Grace Hopper"],
                "abstract": "Culinary techniques for baking.",
                "research_areas": ["Food", "Chemistry"],
                "publication_date": "2023-11-20",
                "url": "https://example.org/bread"
            }
        ]
    }"#;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_catalogue() {
        let data = parse_catalogue(SAMPLE, "sample").unwrap();
        assert_eq!(data.publications.len(), 2);
        assert_eq!(data.last_updated.as_deref(), Some("2024-05-01T12:00:00Z"));
        assert_eq!(data.publications[1].research_areas, vec!["Food", "Chemistry"]);
    }

    #[test]
    fn test_parse_missing_publications() {
        let err = parse_catalogue(r#"{"lastUpdated": "2024-01-01"}"#, "sample").unwrap_err();
        assert!(matches!(err, ProviderError::MissingPublications(_)));
        assert_eq!(err.to_string(), "No publications found in sample");
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_catalogue("not json", "sample").unwrap_err();
        assert!(matches!(err, ProviderError::ParseError(_)));
    }

    #[test]
    fn test_parse_null_abstract_degrades_to_empty() {
        let json = r#"{"publications": [
            {"title": "A", "abstract": null},
            {"title": "B", "abstract": "Graph data."}
        ]}"#;
        let data = parse_catalogue(json, "sample").unwrap();
        assert_eq!(data.publications.len(), 2);

        let empty = &data.publications[0];
        assert!(empty.abstract_text.is_empty());
        assert!(crate::text::tokenize(&empty.abstract_text).is_empty());
        assert_eq!(crate::query::similarity("graph data", &empty.abstract_text), 0.0);
        assert!(crate::query::similarity("graph data", &data.publications[1].abstract_text) > 0.0);
    }

    #[test]
    fn test_parse_empty_publications_is_ok() {
        let data = parse_catalogue(r#"{"publications": []}"#, "sample").unwrap();
        assert!(data.publications.is_empty());
        assert!(data.freshness().is_none());
    }

    #[tokio::test]
    async fn test_json_file_source_load() {
        let file = write_temp(SAMPLE);
        let source = JsonFileSource::new(file.path());

        let data = source.load().await.unwrap();
        assert_eq!(data.publications[0].title, "Adaptive Congestion Control");
        assert_eq!(source.count().await.unwrap(), 2);
        assert!(source.name().starts_with("json:"));
    }

    #[tokio::test]
    async fn test_json_file_source_missing_file() {
        let source = JsonFileSource::new("/nonexistent/publications.json");
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, ProviderError::IoError(_)));
    }
}
