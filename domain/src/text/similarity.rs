//! Fuzzy label matching.
//!
//! Consolidates near-duplicate labels such as `"Invoice Processing Bot"` and
//! `"Invoice Processor Bot"` that survive [`normalize`] but clearly name the
//! same workflow.

use super::normalize::normalize;
use similar::TextDiff;

/// Default threshold above which two labels are considered the same answer.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.85;

/// Character-level sequence similarity of two labels in `[0, 1]`.
///
/// Both labels are normalized first. Identical normalized forms yield exactly
/// `1.0`; otherwise the ratio is `2 * matched_chars / total_chars` over a
/// character diff.
///
/// ```
/// use consensus_domain::text::similarity;
///
/// assert_eq!(similarity("The Lead Scorer", "lead scorer."), 1.0);
/// assert!(similarity("Lead Scorer", "Invoice Matcher") < 0.5);
/// ```
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    if a == b {
        return 1.0;
    }
    f64::from(TextDiff::from_chars(a.as_str(), b.as_str()).ratio())
}

/// Find the candidate most similar to `target`, if it clears `threshold`.
///
/// Ties keep the first candidate encountered. Returns `None` for an empty
/// target or an empty candidate list.
pub fn find_best_match<'a, I>(target: &str, candidates: I, threshold: f64) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    if target.trim().is_empty() {
        return None;
    }

    let mut best: Option<(&'a str, f64)> = None;
    for candidate in candidates {
        let score = similarity(target, candidate);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((candidate, score));
        }
    }

    best.filter(|(_, score)| *score >= threshold)
        .map(|(candidate, _)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_similarity_identical_after_normalization() {
        assert_eq!(similarity("**Support Bot**", "the support bot"), 1.0);
    }

    #[test]
    fn test_similarity_near_duplicates() {
        let score = similarity("Invoice Processing Bot", "Invoice Processor Bot");
        assert!(score >= DEFAULT_FUZZY_THRESHOLD, "score was {score}");
    }

    #[test]
    fn test_similarity_unrelated() {
        let score = similarity("Customer Support Chatbot", "Expense Auditor");
        assert!(score < DEFAULT_FUZZY_THRESHOLD, "score was {score}");
    }

    #[test]
    fn test_find_best_match_picks_highest() {
        let candidates = ["Expense Auditor", "Invoice Processor Bot", "Invoice Bot"];
        let best = find_best_match(
            "Invoice Processing Bot",
            candidates.iter().copied(),
            DEFAULT_FUZZY_THRESHOLD,
        );
        assert_eq!(best, Some("Invoice Processor Bot"));
    }

    #[test]
    fn test_find_best_match_below_threshold() {
        let candidates = ["Expense Auditor"];
        assert_eq!(
            find_best_match("Lead Scorer", candidates.iter().copied(), 0.85),
            None
        );
    }

    #[test]
    fn test_find_best_match_tie_keeps_first() {
        let candidates = ["Lead Scorer", "the lead scorer"];
        assert_eq!(
            find_best_match("Lead Scorer", candidates.iter().copied(), 0.85),
            Some("Lead Scorer")
        );
    }

    #[test]
    fn test_find_best_match_empty_inputs() {
        assert_eq!(find_best_match("", ["Lead Scorer"], 0.85), None);
        assert_eq!(find_best_match("Lead Scorer", Vec::<&str>::new(), 0.85), None);
    }

    proptest! {
        #[test]
        fn prop_self_similarity_is_one(label in "[A-Za-z ]{1,30}") {
            prop_assert_eq!(similarity(&label, &label), 1.0);
        }
    }
}
