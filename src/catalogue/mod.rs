//! Catalogue application state.
//!
//! [`Catalogue`] owns the loaded publication records together with the view
//! state a front end needs (active filters, current page, freshness timestamp
//! and the comparison query). All operations are
//! synchronous methods on this one value, so filter and pagination behaviour
//! can be tested in isolation from any UI.
//!
//! # Usage
//!
//! ```
//! use paper_similarity::catalogue::{Catalogue, CatalogueConfig};
//! use paper_similarity::models::{CatalogueData, PublicationRecord};
//!
//! let data = CatalogueData {
//!     publications: vec![
//!         PublicationRecord::new("Bread", "Culinary techniques for baking."),
//!         PublicationRecord::new("Networks", "Improving network throughput."),
//!     ],
//!     last_updated: Some("2024-05-01".to_string()),
//! };
//! let mut catalogue = Catalogue::from_data(data, CatalogueConfig::default());
//!
//! catalogue.compare("network throughput").unwrap();
//! assert_eq!(catalogue.page().records[0].title, "Networks");
//! assert_eq!(
//!     catalogue.results_summary(),
//!     "Showing 1-2 of 2 publications (Last updated May 1, 2024)"
//! );
//! ```

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{format_score, CatalogueData, PublicationRecord, SimilarityBand};
use crate::provider::{CatalogueSource, ProviderError};
use crate::query::{rank_with, Scoring, SimilarityScorer, TermFrequencyScorer, TfIdfScorer};
use crate::stats::{build_stats, CorpusStats};
use crate::summary::summarize;

/// Default number of publications per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Errors that can occur while operating on the catalogue.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// Comparison requested with a blank query
    #[error("Please enter an abstract to compare")]
    EmptyQuery,

    /// Requested page does not exist
    #[error("Page {page} out of range (1-{total_pages})")]
    PageOutOfRange { page: usize, total_pages: usize },

    /// Loading the catalogue failed
    #[error("Error loading publications: {0}")]
    Provider(#[from] ProviderError),
}

/// Result type for catalogue operations.
pub type CatalogueResult<T> = Result<T, CatalogueError>;

/// Catalogue configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogueConfig {
    /// Publications shown per page (at least 1)
    pub page_size: usize,

    /// Scorer used by [`Catalogue::compare`]
    pub scoring: Scoring,
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            scoring: Scoring::default(),
        }
    }
}

/// Active record filters. Empty fields do not filter.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Filters {
    /// Keep records tagged with any of these research areas
    pub areas: BTreeSet<String>,

    /// Case-insensitive substring of the title
    pub title: String,

    /// Case-insensitive substring of any author name
    pub author: String,
}

impl Filters {
    /// Whether no filter is active.
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty() && self.title.is_empty() && self.author.is_empty()
    }

    /// Whether a record passes every active filter.
    pub fn matches(&self, record: &PublicationRecord) -> bool {
        let title = self.title.to_lowercase();
        let author = self.author.to_lowercase();

        let matches_areas = self.areas.is_empty()
            || record.research_areas.iter().any(|a| self.areas.contains(a));
        let matches_title = title.is_empty() || record.title.to_lowercase().contains(&title);
        let matches_author = author.is_empty()
            || record
                .authors
                .iter()
                .any(|a| a.to_lowercase().contains(&author));

        matches_areas && matches_title && matches_author
    }
}

/// Presentation view of one record, including its value summary.
#[derive(Debug, Clone, Serialize)]
pub struct RecordView {
    /// Publication title
    pub title: String,
    /// Author names in display order
    pub authors: Vec<String>,
    /// Research area tags
    pub research_areas: Vec<String>,
    /// Publication date as provided by the source
    pub publication_date: String,
    /// Link to the publication page
    pub url: String,
    /// One-line summary of the abstract
    pub value_summary: String,
    /// Raw score against the active comparison
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
    /// Score as display text, e.g. "73% similar"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<String>,
    /// Presentation band for the score
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<SimilarityBand>,
}

impl From<&PublicationRecord> for RecordView {
    fn from(record: &PublicationRecord) -> Self {
        Self {
            title: record.title.clone(),
            authors: record.authors.clone(),
            research_areas: record.research_areas.clone(),
            publication_date: record.publication_date.clone(),
            url: record.url.clone(),
            value_summary: summarize(&record.abstract_text),
            similarity_score: record.similarity_score,
            similarity: record.similarity_score.map(format_score),
            band: record.band(),
        }
    }
}

/// One page of filtered results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<'a> {
    /// 1-based page number
    pub number: usize,
    /// Total pages for the current filters (0 when nothing matches)
    pub total_pages: usize,
    /// 1-based index of the first record shown, 0 when nothing matches
    pub start: usize,
    /// 1-based index of the last record shown
    pub end: usize,
    /// Records matching the current filters
    pub total_filtered: usize,
    /// Whether a previous page exists
    pub has_prev: bool,
    /// Whether a next page exists
    pub has_next: bool,
    /// Records on this page
    pub records: Vec<&'a PublicationRecord>,
}

/// The loaded catalogue plus its view state.
#[derive(Debug, Clone)]
pub struct Catalogue {
    records: Vec<PublicationRecord>,
    last_updated: String,
    stats: CorpusStats,
    config: CatalogueConfig,
    filters: Filters,
    current_page: usize,
    comparison: Option<String>,
}

impl Catalogue {
    /// Build the catalogue state from loaded data.
    ///
    /// Corpus statistics are computed here, once per load.
    pub fn from_data(data: CatalogueData, mut config: CatalogueConfig) -> Self {
        config.page_size = config.page_size.max(1);

        let last_updated = match data.freshness() {
            Some(ts) => ts.to_string(),
            None => {
                debug!("No freshness timestamp in catalogue, using current time");
                Utc::now().to_rfc3339()
            }
        };
        let stats = build_stats(&data.publications);

        info!(
            publications = data.publications.len(),
            vocabulary = stats.vocabulary_size(),
            last_updated = %last_updated,
            "Catalogue ready"
        );

        Self {
            records: data.publications,
            last_updated,
            stats,
            config,
            filters: Filters::default(),
            current_page: 1,
            comparison: None,
        }
    }

    /// Load the catalogue from a source.
    ///
    /// # Errors
    /// Returns `CatalogueError::Provider` if the source fails
    pub async fn load<S>(source: &S, config: CatalogueConfig) -> CatalogueResult<Self>
    where
        S: CatalogueSource + ?Sized,
    {
        info!("Loading catalogue from {}", source.name());
        let data = source.load().await?;
        Ok(Self::from_data(data, config))
    }

    /// All records in current catalogue order.
    pub fn records(&self) -> &[PublicationRecord] {
        &self.records
    }

    /// Number of records in the catalogue.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalogue has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> &CorpusStats {
        &self.stats
    }

    pub fn config(&self) -> &CatalogueConfig {
        &self.config
    }

    /// Raw freshness timestamp.
    pub fn last_updated(&self) -> &str {
        &self.last_updated
    }

    /// Distinct research areas across the catalogue, sorted.
    pub fn research_areas(&self) -> Vec<String> {
        self.records
            .iter()
            .flat_map(|r| r.research_areas.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Replace the area filter.
    pub fn set_areas<I, S>(&mut self, areas: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.areas = areas.into_iter().map(Into::into).collect();
        self.filters_changed();
    }

    /// Add one area to the area filter.
    pub fn add_area(&mut self, area: impl Into<String>) {
        self.filters.areas.insert(area.into());
        self.filters_changed();
    }

    /// Set the title substring filter.
    pub fn set_title_filter(&mut self, title: impl Into<String>) {
        self.filters.title = title.into();
        self.filters_changed();
    }

    /// Set the author substring filter.
    pub fn set_author_filter(&mut self, author: impl Into<String>) {
        self.filters.author = author.into();
        self.filters_changed();
    }

    /// Clear every filter.
    pub fn clear_filters(&mut self) {
        self.filters = Filters::default();
        self.filters_changed();
    }

    fn filters_changed(&mut self) {
        self.current_page = 1;
        debug!(filters = ?self.filters, "Filters changed");
    }

    /// Records passing the active filters, in catalogue order.
    pub fn filtered(&self) -> Vec<&PublicationRecord> {
        self.records
            .iter()
            .filter(|r| self.filters.matches(r))
            .collect()
    }

    /// Number of pages for the active filters.
    pub fn total_pages(&self) -> usize {
        self.filtered().len().div_ceil(self.config.page_size)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Advance one page. Returns `false` on the last page.
    pub fn next_page(&mut self) -> bool {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page. Returns `false` on the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to a specific page.
    ///
    /// # Errors
    /// Returns `CatalogueError::PageOutOfRange` for page 0 or a page past the end
    pub fn go_to_page(&mut self, page: usize) -> CatalogueResult<()> {
        let total_pages = self.total_pages().max(1);
        if page == 0 || page > total_pages {
            return Err(CatalogueError::PageOutOfRange { page, total_pages });
        }
        self.current_page = page;
        Ok(())
    }

    /// The current page of filtered records.
    pub fn page(&self) -> Page<'_> {
        let filtered = self.filtered();
        let total_filtered = filtered.len();
        let total_pages = total_filtered.div_ceil(self.config.page_size);

        let start_index = (self.current_page - 1) * self.config.page_size;
        let end_index = (start_index + self.config.page_size).min(total_filtered);
        let records = filtered
            .into_iter()
            .skip(start_index)
            .take(self.config.page_size)
            .collect();

        Page {
            number: self.current_page,
            total_pages,
            start: if total_filtered == 0 { 0 } else { start_index + 1 },
            end: end_index,
            total_filtered,
            has_prev: self.current_page > 1,
            has_next: self.current_page < total_pages,
            records,
        }
    }

    /// One-line description of what the current page shows.
    pub fn results_summary(&self) -> String {
        let page = self.page();
        let mut summary = format!(
            "Showing {}-{} of {} publications",
            page.start, page.end, page.total_filtered
        );
        if page.total_filtered < self.records.len() {
            summary.push_str(&format!(" (filtered from {} total)", self.records.len()));
        }
        summary.push_str(&format!(
            " (Last updated {})",
            format_date(&self.last_updated)
        ));
        summary
    }

    /// The active comparison query, if any.
    pub fn comparison(&self) -> Option<&str> {
        self.comparison.as_deref()
    }

    /// Rank the whole catalogue against a query abstract.
    ///
    /// Filters are kept; the view returns to page 1.
    ///
    /// # Errors
    /// Returns `CatalogueError::EmptyQuery` if the query is blank
    pub fn compare(&mut self, query: &str) -> CatalogueResult<()> {
        if query.trim().is_empty() {
            return Err(CatalogueError::EmptyQuery);
        }

        match self.config.scoring {
            Scoring::TermFrequency => self.rank_by(&TermFrequencyScorer, query),
            Scoring::TfIdf => {
                let scorer = TfIdfScorer::new(self.stats.clone());
                self.rank_by(&scorer, query)
            }
        }

        self.comparison = Some(query.to_string());
        self.current_page = 1;
        Ok(())
    }

    fn rank_by(&mut self, scorer: &dyn SimilarityScorer, query: &str) {
        rank_with(scorer, query, &mut self.records);
    }

    /// Drop all similarity scores and return to page 1.
    ///
    /// Catalogue order is not restored.
    pub fn clear_comparison(&mut self) {
        if self.comparison.take().is_none() {
            debug!("Clearing comparison but none was active");
        }
        crate::query::clear_ranking(&mut self.records);
        self.current_page = 1;
    }
}

/// Format a timestamp as e.g. `"May 1, 2024"`.
///
/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` timestamps and
/// plain `YYYY-MM-DD` dates. Anything else is returned unchanged.
pub fn format_date(raw: &str) -> String {
    parse_date(raw)
        .map(|date| date.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
