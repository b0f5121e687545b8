//! Corpus statistics over catalogue abstracts.
//!
//! Builds document-frequency and inverse-document-frequency maps from every
//! abstract in the catalogue. The default scorer in [`crate::query`] does not
//! consult these; they feed the opt-in [`crate::query::TfIdfScorer`] and any
//! other consumer that wants corpus-level weights.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::models::PublicationRecord;
use crate::text::tokenize;

/// Document and inverse document frequencies for one corpus.
///
/// For every token present: `1 <= document_frequency <= document_count`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CorpusStats {
    /// Number of documents the statistics were built from
    pub document_count: usize,

    /// Token -> number of abstracts containing it at least once
    pub document_frequency: HashMap<String, usize>,

    /// Token -> ln(document_count / document_frequency)
    pub inverse_document_frequency: HashMap<String, f64>,
}

impl CorpusStats {
    /// Build statistics from raw abstract texts.
    ///
    /// Each distinct token counts once per document regardless of how often it
    /// occurs there. An empty corpus produces empty maps.
    pub fn from_abstracts<'a, I>(abstracts: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut document_count = 0usize;
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        for text in abstracts {
            document_count += 1;
            let distinct: HashSet<String> = tokenize(text).into_iter().collect();
            for token in distinct {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }

        let n = document_count as f64;
        let inverse_document_frequency = document_frequency
            .iter()
            .map(|(token, df)| (token.clone(), (n / *df as f64).ln()))
            .collect();

        debug!(
            documents = document_count,
            vocabulary = document_frequency.len(),
            "Built corpus statistics"
        );

        Self {
            document_count,
            document_frequency,
            inverse_document_frequency,
        }
    }

    /// Document frequency of a token, or 0 if the corpus never saw it.
    pub fn df(&self, token: &str) -> usize {
        self.document_frequency.get(token).copied().unwrap_or(0)
    }

    /// Inverse document frequency of a token, if the corpus saw it.
    pub fn idf(&self, token: &str) -> Option<f64> {
        self.inverse_document_frequency.get(token).copied()
    }

    /// Number of distinct tokens in the corpus.
    pub fn vocabulary_size(&self) -> usize {
        self.document_frequency.len()
    }

    /// Whether the statistics were built from an empty corpus.
    pub fn is_empty(&self) -> bool {
        self.document_count == 0
    }
}

/// Build corpus statistics from a catalogue.
pub fn build_stats(catalogue: &[PublicationRecord]) -> CorpusStats {
    CorpusStats::from_abstracts(catalogue.iter().map(|r| r.abstract_text.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<PublicationRecord> {
        vec![
            PublicationRecord::new("a", "Graph neural networks for graph data."),
            PublicationRecord::new("b", "Neural networks improve translation."),
            PublicationRecord::new("c", "Networks of sensors."),
        ]
    }

    #[test]
    fn test_empty_corpus() {
        let stats = build_stats(&[]);
        assert!(stats.is_empty());
        assert!(stats.document_frequency.is_empty());
        assert!(stats.inverse_document_frequency.is_empty());
    }

    #[test]
    fn test_document_frequency_counts_once_per_document() {
        let stats = build_stats(&corpus());
        assert_eq!(stats.document_count, 3);
        // "graph" appears twice in the first abstract only
        assert_eq!(stats.df("graph"), 1);
        assert_eq!(stats.df("neural"), 2);
        assert_eq!(stats.df("networks"), 3);
        assert_eq!(stats.df("missing"), 0);
    }

    #[test]
    fn test_idf_values() {
        let stats = build_stats(&corpus());
        let idf_graph = stats.idf("graph").unwrap();
        assert!((idf_graph - 3f64.ln()).abs() < 1e-12);
        let idf_neural = stats.idf("neural").unwrap();
        assert!((idf_neural - (3.0f64 / 2.0).ln()).abs() < 1e-12);
        // present in every document
        assert_eq!(stats.idf("networks"), Some(0.0));
        assert_eq!(stats.idf("missing"), None);
    }

    #[test]
    fn test_df_bounds_invariant() {
        let stats = build_stats(&corpus());
        for df in stats.document_frequency.values() {
            assert!(*df >= 1 && *df <= stats.document_count);
        }
    }

    #[test]
    fn test_empty_abstracts_count_as_documents() {
        let records = vec![
            PublicationRecord::new("a", ""),
            PublicationRecord::new("b", "Quantum computing."),
        ];
        let stats = build_stats(&records);
        assert_eq!(stats.document_count, 2);
        assert_eq!(stats.vocabulary_size(), 2);
        assert!(!stats.document_frequency.contains_key(""));
        assert!((stats.idf("quantum").unwrap() - 2f64.ln()).abs() < 1e-12);
    }
}
