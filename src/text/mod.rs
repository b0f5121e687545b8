//! Text normalization and tokenization.
//!
//! Every lexical comparison in the crate goes through [`tokenize`], so scoring
//! and corpus statistics always agree on what a token is:
//! - Converts to lowercase
//! - Drops every character that is not an ASCII word character (`[A-Za-z0-9_]`)
//!   or whitespace
//! - Splits on runs of whitespace
//! - Discards tokens shorter than [`MIN_TOKEN_CHARS`] characters

use indexmap::IndexMap;

/// Minimum token length (in characters) kept after normalization.
pub const MIN_TOKEN_CHARS: usize = 3;

/// Occurrence count per token, in first-occurrence order.
pub type TermVector = IndexMap<String, usize>;

/// Lowercase the text and strip punctuation, keeping whitespace intact.
///
/// # Example
/// ```
/// use paper_similarity::text::normalize_text;
/// assert_eq!(normalize_text("Fast, Safe & Sound!"), "fast safe  sound");
/// ```
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| is_word_char(*c) || c.is_whitespace())
        .collect()
}

/// Split text into normalized tokens.
///
/// Tokens are never empty and never shorter than [`MIN_TOKEN_CHARS`].
/// Empty or punctuation-only input yields an empty sequence.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize_text(text)
        .split_whitespace()
        .filter(|word| word.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_owned)
        .collect()
}

/// Raw term-frequency counts for a text.
pub fn term_frequencies(text: &str) -> TermVector {
    count_tokens(tokenize(text))
}

/// Count a token sequence, preserving first-occurrence order.
pub fn count_tokens<I>(tokens: I) -> TermVector
where
    I: IntoIterator<Item = String>,
{
    let mut counts = TermVector::new();
    for token in tokens {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("Hello, World!"), "hello world");
        assert_eq!(normalize_text("UPPER_case 42"), "upper_case 42");
        assert_eq!(normalize_text("state-of-the-art"), "stateoftheart");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_tokenize_drops_short_words() {
        assert_eq!(
            tokenize("We use an AI model to do it"),
            vec!["use", "model"]
        );
    }

    #[test]
    fn test_tokenize_collapses_whitespace() {
        assert_eq!(
            tokenize("  graph\n\tneural   networks  "),
            vec!["graph", "neural", "networks"]
        );
    }

    #[test]
    fn test_tokenize_empty_and_punctuation_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
        assert!(tokenize("... !!! ?? -- ()").is_empty());
    }

    #[test]
    fn test_tokenize_strips_non_ascii_letters() {
        // Only ASCII word characters survive normalization.
        assert_eq!(tokenize("naïve café"), vec!["nave", "caf"]);
    }

    #[test]
    fn test_tokens_never_short() {
        let tokens = tokenize("a bb ccc dddd e.f.g h-i-j");
        assert!(tokens.iter().all(|t| t.chars().count() >= MIN_TOKEN_CHARS));
        assert_eq!(tokens, vec!["ccc", "dddd", "efg", "hij"]);
    }

    #[test]
    fn test_term_frequencies_order_and_counts() {
        let tf = term_frequencies("Graph models. Graph data, graph models!");
        let entries: Vec<(&str, usize)> = tf.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(entries, vec![("graph", 3), ("models", 2), ("data", 1)]);
    }
}
