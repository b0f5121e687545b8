//! Similarity scoring and ranking.
//!
//! This module compares a query abstract against catalogue abstracts and ranks
//! the catalogue by the result. Scoring is lexical: both texts are tokenized
//! with [`crate::text::tokenize`], counted, laid out over their joint
//! vocabulary, and compared with cosine similarity.
//!
//! # Usage
//!
//! ```
//! use paper_similarity::models::PublicationRecord;
//! use paper_similarity::query::{clear_ranking, rank};
//!
//! let mut catalogue = vec![
//!     PublicationRecord::new("Baking", "Culinary techniques for baking bread."),
//!     PublicationRecord::new("Networks", "Improving network throughput in data centers."),
//! ];
//!
//! rank("network throughput", &mut catalogue);
//! assert_eq!(catalogue[0].title, "Networks");
//! assert!(catalogue[0].similarity_score.unwrap() > 0.0);
//!
//! clear_ranking(&mut catalogue);
//! assert!(catalogue.iter().all(|r| r.similarity_score.is_none()));
//! ```
//!
//! The default scorer is plain term-frequency cosine similarity and ignores
//! corpus statistics. [`TfIdfScorer`] is the opt-in IDF-weighted variant.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::PublicationRecord;
use crate::stats::CorpusStats;
use crate::text::{term_frequencies, TermVector};

/// Which scorer the ranker should use.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Scoring {
    /// Raw term-frequency cosine similarity
    #[default]
    TermFrequency,

    /// Term frequency weighted by corpus IDF
    TfIdf,
}

/// Trait for pairwise abstract scorers.
///
/// Implementations must be pure: the same `(query, candidate)` pair always
/// yields the same score, and the score is always finite and in `[0, 1]`.
pub trait SimilarityScorer {
    /// Score a candidate abstract against a query abstract.
    fn score(&self, query: &str, candidate: &str) -> f64;

    /// Short identifier used in logs.
    fn name(&self) -> &str;
}

/// Raw term-frequency cosine similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermFrequencyScorer;

impl SimilarityScorer for TermFrequencyScorer {
    fn score(&self, query: &str, candidate: &str) -> f64 {
        similarity(query, candidate)
    }

    fn name(&self) -> &str {
        "term-frequency"
    }
}

/// Term-frequency cosine similarity with each count scaled by its IDF.
///
/// Tokens the corpus never saw are weighted as if they occurred in exactly one
/// document, i.e. `ln(N)`.
#[derive(Debug, Clone)]
pub struct TfIdfScorer {
    stats: CorpusStats,
    unseen_weight: f64,
}

impl TfIdfScorer {
    /// Create a scorer over precomputed corpus statistics.
    pub fn new(stats: CorpusStats) -> Self {
        let unseen_weight = (stats.document_count.max(1) as f64).ln();
        Self {
            stats,
            unseen_weight,
        }
    }

    fn weight(&self, token: &str) -> f64 {
        self.stats.idf(token).unwrap_or(self.unseen_weight)
    }
}

impl SimilarityScorer for TfIdfScorer {
    fn score(&self, query: &str, candidate: &str) -> f64 {
        let query_tf = term_frequencies(query);
        let candidate_tf = term_frequencies(candidate);
        let (a, b) = joint_vectors(&query_tf, &candidate_tf);
        let weights: Vec<f64> = joint_vocabulary(&query_tf, &candidate_tf)
            .into_iter()
            .map(|t| self.weight(t))
            .collect();

        let a: Vec<f64> = a.iter().zip(&weights).map(|(x, w)| x * w).collect();
        let b: Vec<f64> = b.iter().zip(&weights).map(|(x, w)| x * w).collect();
        cosine_similarity(&a, &b)
    }

    fn name(&self) -> &str {
        "tf-idf"
    }
}

/// Compute cosine similarity between two equal-length vectors.
///
/// Returns 0.0 when either vector has zero magnitude instead of dividing by
/// zero. For non-negative inputs the result lies in `[0, 1]`.
///
/// # Panics
/// Panics if the vectors have different lengths.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "Vectors must have the same length");

    let dot_product: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot_product / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Distinct tokens of both vectors: `a`'s tokens first, then tokens only in `b`.
fn joint_vocabulary<'a>(a: &'a TermVector, b: &'a TermVector) -> Vec<&'a str> {
    a.keys()
        .chain(b.keys().filter(|k| !a.contains_key(*k)))
        .map(String::as_str)
        .collect()
}

/// Lay two term vectors out over their joint vocabulary.
///
/// Both returned vectors have one entry per distinct token in either input,
/// with 0 where a side lacks the token.
pub fn joint_vectors(a: &TermVector, b: &TermVector) -> (Vec<f64>, Vec<f64>) {
    joint_vocabulary(a, b)
        .into_iter()
        .map(|token| {
            (
                a.get(token).copied().unwrap_or(0) as f64,
                b.get(token).copied().unwrap_or(0) as f64,
            )
        })
        .unzip()
}

/// Term-frequency cosine similarity between two abstracts.
///
/// Symmetric, deterministic, and 0.0 whenever either side tokenizes to nothing.
pub fn similarity(a: &str, b: &str) -> f64 {
    let (va, vb) = joint_vectors(&term_frequencies(a), &term_frequencies(b));
    cosine_similarity(&va, &vb)
}

/// Score every record against `query` and sort the catalogue by score.
///
/// Uses [`TermFrequencyScorer`]. See [`rank_with`].
pub fn rank(query: &str, catalogue: &mut [PublicationRecord]) {
    rank_with(&TermFrequencyScorer, query, catalogue)
}

/// Score every record with `scorer` and sort the catalogue by score.
///
/// Each record's `similarity_score` is overwritten. The sort is descending and
/// stable, so ties keep their current relative order.
pub fn rank_with<S>(scorer: &S, query: &str, catalogue: &mut [PublicationRecord])
where
    S: SimilarityScorer + ?Sized,
{
    debug!(
        scorer = scorer.name(),
        records = catalogue.len(),
        "Ranking catalogue against query"
    );

    for record in catalogue.iter_mut() {
        record.similarity_score = Some(scorer.score(query, &record.abstract_text));
    }

    catalogue.sort_by(|a, b| {
        let sa = a.similarity_score.unwrap_or(0.0);
        let sb = b.similarity_score.unwrap_or(0.0);
        sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal)
    });

    if let Some(top) = catalogue.first() {
        info!(
            top_score = top.similarity_score.unwrap_or(0.0),
            top_title = %top.title,
            "Ranked {} publications",
            catalogue.len()
        );
    }
}

/// Remove the similarity score from every record.
///
/// The catalogue order is left as the last ranking produced it.
pub fn clear_ranking(catalogue: &mut [PublicationRecord]) {
    for record in catalogue.iter_mut() {
        record.similarity_score = None;
    }
    debug!(records = catalogue.len(), "Cleared similarity scores");
}
