//! Core data models for the publication catalogue.
//!
//! This module contains the record schema shared by every other module: the
//! publication record as it appears in the catalogue JSON, the loaded catalogue
//! payload, and the presentation band derived from a similarity score.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single publication in the catalogue.
///
/// Text fields default to empty when missing, null or of the wrong type, so a
/// malformed record degrades to an empty abstract rather than failing the load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PublicationRecord {
    /// Publication title
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,

    /// Author names in display order
    #[serde(default, deserialize_with = "lenient_strings")]
    pub authors: Vec<String>,

    /// Abstract text
    #[serde(default, rename = "abstract", deserialize_with = "lenient_string")]
    pub abstract_text: String,

    /// Research areas (order preserved for display, insignificant for filtering)
    #[serde(default, deserialize_with = "lenient_strings")]
    pub research_areas: Vec<String>,

    /// Publication date as provided by the source
    #[serde(default, deserialize_with = "lenient_string")]
    pub publication_date: String,

    /// Link to the publication page
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,

    /// When the record was scraped, used as a fallback freshness indicator
    #[serde(default, rename = "dateScraped", skip_serializing_if = "Option::is_none")]
    pub date_scraped: Option<String>,

    /// Cosine similarity against the last comparison query, in [0, 1].
    ///
    /// Absent for a record that has never been compared, and cleared again
    /// when the comparison is reset. Never read from input.
    #[serde(
        skip_deserializing,
        rename = "similarityScore",
        skip_serializing_if = "Option::is_none"
    )]
    pub similarity_score: Option<f64>,
}

/// A string field; null or any non-string value reads as empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

/// A list of strings; non-string entries are skipped and anything other than
/// an array reads as empty.
fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

impl PublicationRecord {
    /// Create a record with the fields the core actually reads.
    pub fn new(title: impl Into<String>, abstract_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            abstract_text: abstract_text.into(),
            ..Self::default()
        }
    }

    /// Builder-style helper to set the authors.
    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style helper to set the research areas.
    pub fn with_areas<I, S>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.research_areas = areas.into_iter().map(Into::into).collect();
        self
    }

    /// Presentation band for the current score, if the record has been compared.
    pub fn band(&self) -> Option<SimilarityBand> {
        self.similarity_score.map(SimilarityBand::from_score)
    }
}

/// The catalogue payload as delivered by a data source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogueData {
    /// Ordered publication records
    pub publications: Vec<PublicationRecord>,

    /// Corpus-wide last-updated timestamp, if the source provides one
    #[serde(default, rename = "lastUpdated", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl CatalogueData {
    /// The freshness timestamp to display for this catalogue.
    ///
    /// Prefers the corpus-wide `lastUpdated`, then the first record's scrape
    /// timestamp. Returns `None` when neither is available.
    pub fn freshness(&self) -> Option<&str> {
        self.last_updated
            .as_deref()
            .or_else(|| self.publications.first()?.date_scraped.as_deref())
    }
}

/// Severity band for presenting a similarity score.
///
/// Bands are for display only and never feed back into scoring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityBand {
    /// Score of at least 0.70
    High,

    /// Score of at least 0.40
    Medium,

    /// Anything lower
    Low,
}

impl SimilarityBand {
    /// Determine the band from a cosine similarity score.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            SimilarityBand::High
        } else if score >= 0.4 {
            SimilarityBand::Medium
        } else {
            SimilarityBand::Low
        }
    }

    /// Lowercase label used in rendered output.
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityBand::High => "high",
            SimilarityBand::Medium => "medium",
            SimilarityBand::Low => "low",
        }
    }
}

/// Render a score the way the catalogue displays it, e.g. `"73% similar"`.
pub fn format_score(score: f64) -> String {
    format!("{}% similar", (score * 100.0).round() as i64)
}
