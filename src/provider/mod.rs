//! Catalogue source module.
//!
//! This module defines the interface for obtaining the publication catalogue
//! and includes implementations for different data sources.
//!
//! The `CatalogueSource` trait abstracts where the catalogue comes from, so the
//! application state in [`crate::catalogue`] can be built from a static JSON
//! file, an embedded fixture, or anything else that yields [`CatalogueData`].

use async_trait::async_trait;
use thiserror::Error;

use crate::models::CatalogueData;

pub mod json;

/// Errors that can occur when loading a catalogue.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Failed to read from the data source
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse the data format
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The payload parsed but carries no `publications` list
    #[error("No publications found in {0}")]
    MissingPublications(String),
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Trait for catalogue data sources.
///
/// The catalogue is read once at startup and never written back, so sources
/// only need to support loading.
#[async_trait]
pub trait CatalogueSource: Send + Sync {
    /// Load the full catalogue.
    ///
    /// # Errors
    /// Returns `ProviderError` if the catalogue cannot be read or parsed
    async fn load(&self) -> ProviderResult<CatalogueData>;

    /// Count the publications available from this source.
    ///
    /// The default implementation loads the whole catalogue.
    async fn count(&self) -> ProviderResult<usize> {
        self.load().await.map(|data| data.publications.len())
    }

    /// Get a human-readable name/description of this source.
    ///
    /// This is useful for logging and error messages.
    fn name(&self) -> &str;
}
