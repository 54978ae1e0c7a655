//! Keyword extraction for relevance scoring.

use std::collections::HashMap;

/// Tokens shorter than this are ignored.
pub const MIN_KEYWORD_LEN: usize = 4;

/// Common English and business-filler words that carry no topical signal.
const STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "also", "because", "been", "before", "being", "below",
    "between", "both", "business", "could", "does", "doing", "down", "during", "each", "from",
    "further", "have", "having", "here", "into", "just", "like", "more", "most", "much", "need",
    "needs", "only", "other", "over", "same", "should", "some", "such", "than", "that", "their",
    "them", "then", "there", "these", "they", "this", "those", "through", "under", "until",
    "very", "want", "what", "when", "where", "which", "while", "will", "with", "within",
    "would", "your", "company", "using", "make", "help", "team", "work",
];

/// Whether a lowercase token is a stopword.
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Lowercase alphanumeric tokens of `text`, in order, stopwords included.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

/// Keyword → `ln(1 + count)` weights for `text`.
///
/// Only tokens of at least [`MIN_KEYWORD_LEN`] characters that are not
/// stopwords count.
pub fn keyword_weights(text: &str) -> HashMap<String, f64> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in tokenize(text) {
        if token.chars().count() >= MIN_KEYWORD_LEN && !is_stopword(&token) {
            *counts.entry(token).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .map(|(token, count)| (token, (1.0 + count as f64).ln()))
        .collect()
}
