//! Paper Similarity - lexical "find similar publications" for a research catalogue.
//!
//! This library provides the core of a publication catalogue browser: ranking
//! publications against a user-supplied abstract and extracting a one-line
//! value statement from each abstract.
//!
//! # Architecture
//!
//! The system is organized into several key modules:
//!
//! - **models**: Core data structures (PublicationRecord, CatalogueData, SimilarityBand)
//! - **text**: Tokenization and term-frequency counting
//! - **stats**: Corpus document frequency / IDF statistics
//! - **query**: Cosine similarity scoring and catalogue ranking
//! - **summary**: Rule-based value summaries
//! - **provider**: Catalogue data sources (JSON file)
//! - **catalogue**: Application state (filters, pagination, comparison)
//!
//! # Workflow
//!
//! 1. Load the catalogue JSON through a `CatalogueSource`
//! 2. Build corpus statistics once at load
//! 3. On a comparison query, score every abstract against the query, attach
//!    the score to each record, and sort the catalogue descending
//! 4. Render a page of filtered records, summarizing each abstract on the fly
//!
//! # Example
//!
//! ```ignore
//! use paper_similarity::{
//!     catalogue::{Catalogue, CatalogueConfig},
//!     provider::json::JsonFileSource,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = JsonFileSource::new("publications.json");
//!     let mut catalogue = Catalogue::load(&source, CatalogueConfig::default()).await?;
//!
//!     catalogue.compare("We study congestion control for data center networks.")?;
//!     for record in catalogue.page().records {
//!         println!("{:.3} {}", record.similarity_score.unwrap_or(0.0), record.title);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Public modules
pub mod catalogue;
pub mod models;
pub mod provider;
pub mod query;
pub mod stats;
pub mod summary;
pub mod text;

// Re-export commonly used types at the crate root
pub use catalogue::{Catalogue, CatalogueConfig, CatalogueError, Filters};
pub use models::{CatalogueData, PublicationRecord, SimilarityBand};
pub use provider::CatalogueSource;
pub use query::{clear_ranking, rank, similarity, Scoring, SimilarityScorer};
pub use stats::{build_stats, CorpusStats};
pub use summary::summarize;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
